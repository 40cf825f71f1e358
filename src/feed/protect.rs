//! Password gating for comments on protected posts.

use crate::{store::PostRef, utils::html};

/// Description shown in place of a protected comment.
pub const PROTECTED_DESCRIPTION: &str =
    "Protected Comments: Please enter your password to view comments.";

/// Form field carrying the submitted password.
pub const PASSWORD_FIELD: &str = "post_password";

/// Whether the requester may see real comment bodies for `post`.
///
/// Posts without a password (or with an empty one) are always open.
/// Otherwise the credential must match exactly.
pub fn is_unlocked(post: &PostRef, credential: Option<&str>) -> bool {
    match post.required_password() {
        None => true,
        Some(required) => credential == Some(required),
    }
}

/// HTML password prompt placed in `content:encoded` for locked items.
pub fn password_form(action: &str, post_id: u64) -> String {
    let action = html::escape_attr(action);
    format!(
        "<form action=\"{action}\" class=\"post-password-form\" method=\"post\">\n\
         <p>This post is password protected. To view it please enter your password below:</p>\n\
         <p><label for=\"pwbox-{post_id}\">Password: \
         <input name=\"{PASSWORD_FIELD}\" id=\"pwbox-{post_id}\" type=\"password\" size=\"20\" /></label> \
         <input type=\"submit\" name=\"Submit\" value=\"Submit\" /></p>\n\
         </form>"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(password: Option<&str>) -> PostRef {
        PostRef {
            id: 5,
            title: "Secret".into(),
            slug: "secret".into(),
            password: password.map(String::from),
        }
    }

    #[test]
    fn test_open_post_ignores_credential() {
        assert!(is_unlocked(&post(None), None));
        assert!(is_unlocked(&post(None), Some("anything")));
        assert!(is_unlocked(&post(Some("")), None));
    }

    #[test]
    fn test_protected_post_requires_exact_match() {
        let post = post(Some("abc"));
        assert!(!is_unlocked(&post, None));
        assert!(!is_unlocked(&post, Some("")));
        assert!(!is_unlocked(&post, Some("ABC")));
        assert!(!is_unlocked(&post, Some("abc ")));
        assert!(is_unlocked(&post, Some("abc")));
    }

    #[test]
    fn test_password_form() {
        let form = password_form("https://example.com/wp-pass.php?a=1&b=2", 5);
        assert!(form.starts_with("<form action=\"https://example.com/wp-pass.php?a=1&amp;b=2\""));
        assert!(form.contains("name=\"post_password\""));
        assert!(form.contains("id=\"pwbox-5\""));
        assert!(form.ends_with("</form>"));
    }
}
