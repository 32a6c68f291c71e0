/// Who is signed in for this window. Starts signed out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    user: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn login(&mut self, username: impl Into<String>) {
        self.user = Some(username.into());
    }

    pub fn logout(&mut self) {
        self.user = None;
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn current_user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    pub fn is_admin(&self, admin_user: &str) -> bool {
        self.current_user() == Some(admin_user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_then_logout_clears_user() {
        let mut s = Session::new();
        assert!(!s.is_authenticated());
        s.login("ana");
        assert_eq!(s.current_user(), Some("ana"));
        assert!(!s.is_admin("admin"));
        s.logout();
        assert_eq!(s, Session::default());
    }

    #[test]
    fn admin_is_matched_by_username() {
        let mut s = Session::new();
        s.login("admin");
        assert!(s.is_admin("admin"));
    }
}
