//! Unit tests for environment helpers.

use super::*;

fn value(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

#[test]
fn set_var_restores_previous_value() {
    let _outer = set_var("ENVIRONMENT_D_HELPER_SET", "original");
    {
        let _inner = set_var("ENVIRONMENT_D_HELPER_SET", "changed");
        assert_eq!(value("ENVIRONMENT_D_HELPER_SET").as_deref(), Some("changed"));
    }
    assert_eq!(value("ENVIRONMENT_D_HELPER_SET").as_deref(), Some("original"));
}

#[test]
fn remove_var_restores_previous_value() {
    let _outer = set_var("ENVIRONMENT_D_HELPER_REMOVE", "kept");
    {
        let _inner = remove_var("ENVIRONMENT_D_HELPER_REMOVE");
        assert_eq!(value("ENVIRONMENT_D_HELPER_REMOVE"), None);
    }
    assert_eq!(value("ENVIRONMENT_D_HELPER_REMOVE").as_deref(), Some("kept"));
}

#[test]
fn guard_removes_variables_that_did_not_exist() {
    let _clear = remove_var("ENVIRONMENT_D_HELPER_FRESH");
    {
        let _guard = set_var("ENVIRONMENT_D_HELPER_FRESH", "temporary");
        assert!(value("ENVIRONMENT_D_HELPER_FRESH").is_some());
    }
    assert_eq!(value("ENVIRONMENT_D_HELPER_FRESH"), None);
}

#[test]
fn user_dirs_scope_pins_and_restores_both_variables() {
    let _xdg = set_var("XDG_CONFIG_HOME", "/before/xdg");
    let _home = set_var("HOME", "/before/home");
    {
        let _scope = UserDirsScope::cleared().xdg_config_home("/pinned/xdg");
        assert_eq!(value("XDG_CONFIG_HOME").as_deref(), Some("/pinned/xdg"));
        assert_eq!(value("HOME"), None);
    }
    assert_eq!(value("XDG_CONFIG_HOME").as_deref(), Some("/before/xdg"));
    assert_eq!(value("HOME").as_deref(), Some("/before/home"));
}
