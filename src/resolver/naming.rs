//! Naming conventions shared by handler classes and their methods.

/// Suffixes stripped from a class name to derive its handler name.
pub const HANDLER_SUFFIXES: [&str; 2] = ["Presenter", "Handler"];

/// Prefix stripped from a method name to derive its action name.
pub const ACTION_PREFIX: &str = "action";

/// The class name without its namespace (`App\Presenters\UsersPresenter`,
/// `app::handlers::UsersHandler` and `app.UsersHandler` all give the last
/// segment).
#[must_use]
pub fn short_class_name(class: &str) -> &str {
    class
        .rsplit(|c: char| matches!(c, '\\' | ':' | '/' | '.'))
        .find(|segment| !segment.is_empty())
        .unwrap_or(class)
}

/// Handler name for a class: the short name with a trailing `Presenter` or
/// `Handler` removed.
#[must_use]
pub fn handler_name(class: &str) -> String {
    let short = short_class_name(class);
    HANDLER_SUFFIXES
        .iter()
        .find_map(|suffix| short.strip_suffix(suffix))
        .filter(|stripped| !stripped.is_empty())
        .unwrap_or(short)
        .to_string()
}

/// Action name for a method: `actionShowAll` becomes `showAll`.
#[must_use]
pub fn action_name(method: &str) -> String {
    lcfirst(method.strip_prefix(ACTION_PREFIX).unwrap_or(method))
}

fn lcfirst(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_class_name() {
        assert_eq!(short_class_name("App\\Presenters\\UsersPresenter"), "UsersPresenter");
        assert_eq!(short_class_name("app::handlers::UsersHandler"), "UsersHandler");
        assert_eq!(short_class_name("Users"), "Users");
    }

    #[test]
    fn test_handler_name_strips_suffix() {
        assert_eq!(handler_name("App\\UsersPresenter"), "Users");
        assert_eq!(handler_name("OrdersHandler"), "Orders");
        assert_eq!(handler_name("Health"), "Health");
        assert_eq!(handler_name("Presenter"), "Presenter");
    }

    #[test]
    fn test_action_name() {
        assert_eq!(action_name("actionShow"), "show");
        assert_eq!(action_name("actionShowAll"), "showAll");
        assert_eq!(action_name("Render"), "render");
        assert_eq!(action_name("read"), "read");
        assert_eq!(action_name("action"), "");
    }
}
