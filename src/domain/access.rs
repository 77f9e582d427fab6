// Access classification for the signed-in identity
use serde::Serialize;

use super::visibility::PublicSettings;

/// What the identity provider tells us about the current caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Option<String>,
    pub role: Option<String>,
}

impl Identity {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn signed_in(user_id: impl Into<String>, role: Option<&str>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            role: role.map(str::to_string),
        }
    }

    pub fn is_signed_in(&self) -> bool {
        self.user_id.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AccessLevel {
    Administrator,
    Organization,
    PublicUser,
}

impl AccessLevel {
    /// Classify from the role claim. Unknown, missing, or signed-out ⇒ public.
    pub fn classify(identity: &Identity) -> Self {
        if !identity.is_signed_in() {
            return AccessLevel::PublicUser;
        }

        match identity.role.as_deref().map(str::trim) {
            Some("admin") => AccessLevel::Administrator,
            Some("organization") => AccessLevel::Organization,
            _ => AccessLevel::PublicUser,
        }
    }

    /// Whether submissions may be fetched for this caller.
    pub fn may_view(self, settings: PublicSettings) -> bool {
        match self {
            AccessLevel::Administrator | AccessLevel::Organization => true,
            AccessLevel::PublicUser => settings.is_public_data_enabled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_roles() {
        let admin = Identity::signed_in("u1", Some("admin"));
        let org = Identity::signed_in("u2", Some(" organization "));
        let other = Identity::signed_in("u3", Some("Admin"));
        let no_role = Identity::signed_in("u4", None);

        assert_eq!(AccessLevel::classify(&admin), AccessLevel::Administrator);
        assert_eq!(AccessLevel::classify(&org), AccessLevel::Organization);
        assert_eq!(AccessLevel::classify(&other), AccessLevel::PublicUser);
        assert_eq!(AccessLevel::classify(&no_role), AccessLevel::PublicUser);
    }

    #[test]
    fn test_role_ignored_when_signed_out() {
        let identity = Identity {
            user_id: None,
            role: Some("admin".to_string()),
        };
        assert_eq!(AccessLevel::classify(&identity), AccessLevel::PublicUser);
        assert_eq!(AccessLevel::classify(&Identity::anonymous()), AccessLevel::PublicUser);
    }

    #[test]
    fn test_gate_policy() {
        let private = PublicSettings::private();
        let public = PublicSettings::public();

        assert!(!AccessLevel::PublicUser.may_view(private));
        assert!(AccessLevel::PublicUser.may_view(public));
        assert!(AccessLevel::Administrator.may_view(private));
        assert!(AccessLevel::Organization.may_view(private));
    }
}
