//! Ordering and user directory resolution tests for [`SearchPath`].

use anyhow::{Result, ensure};
use camino::Utf8PathBuf;
use rstest::rstest;
use test_helpers::env::UserDirsScope;

use super::*;

fn dirs(path: &SearchPath) -> Vec<&str> {
    path.iter().map(|dir| dir.as_str()).collect()
}

#[rstest]
fn default_builder_uses_compiled_roots_after_the_user_directory() -> Result<()> {
    let _scope = UserDirsScope::cleared().xdg_config_home("/home/tester/.config");
    let path = resolve_directories()?;
    ensure!(
        dirs(&path)
            == [
                "/home/tester/.config/environment.d",
                "/etc/environment.d",
                "/run/environment.d",
                "/usr/local/lib/environment.d",
                "/usr/lib/environment.d",
            ],
        "unexpected search path {path:?}"
    );
    Ok(())
}

#[rstest]
fn user_directory_is_prepended_not_appended() -> Result<()> {
    let path = SearchPath::builder("environment.d")
        .system_roots(["/sys-a", "/sys-b"])
        .user_config_home("/user")
        .build()?;
    ensure!(path.dirs().first().map(|dir| dir.as_str()) == Some("/user/environment.d"));
    ensure!(path.dirs().last().map(|dir| dir.as_str()) == Some("/sys-b/environment.d"));
    Ok(())
}

#[rstest]
fn user_directory_can_be_left_out() -> Result<()> {
    let path = SearchPath::builder("environment.d")
        .system_roots(["/sys"])
        .without_user_directory()
        .build()?;
    ensure!(dirs(&path) == ["/sys/environment.d"]);
    Ok(())
}

#[rstest]
fn duplicate_roots_collapse_to_first_occurrence() -> Result<()> {
    let path = SearchPath::builder("environment.d")
        .system_roots(["/etc", "/run", "/etc"])
        .user_config_home("/run")
        .build()?;
    ensure!(
        dirs(&path) == ["/run/environment.d", "/etc/environment.d"],
        "unexpected search path {path:?}"
    );
    Ok(())
}

#[rstest]
fn empty_subdirectory_searches_roots_directly() -> Result<()> {
    let path = SearchPath::builder("")
        .system_roots(["/sys"])
        .user_config_home("/user")
        .build()?;
    ensure!(dirs(&path) == ["/user", "/sys"]);
    Ok(())
}

#[rstest]
fn xdg_config_home_takes_precedence_over_home() -> Result<()> {
    let _scope = UserDirsScope::cleared()
        .xdg_config_home("/xdg")
        .home("/home/tester");
    ensure!(user_config_home()? == Some(Utf8PathBuf::from("/xdg")));
    Ok(())
}

#[rstest]
#[case("")]
#[case("relative/config")]
fn unusable_xdg_config_home_falls_back_to_home(#[case] xdg: &str) -> Result<()> {
    let _scope = UserDirsScope::cleared()
        .xdg_config_home(xdg)
        .home("/home/tester");
    ensure!(user_config_home()? == Some(Utf8PathBuf::from("/home/tester/.config")));
    Ok(())
}

#[rstest]
fn relative_home_is_a_resolution_error() -> Result<()> {
    let _scope = UserDirsScope::cleared().home("not/absolute");
    let result = user_config_home();
    ensure!(
        matches!(
            result,
            Err(GeneratorError::PathResolution {
                variable: "HOME",
                ..
            })
        ),
        "expected a resolution error, got {result:?}"
    );
    let build = SearchPath::builder(ENVIRONMENT_D).build();
    ensure!(build.is_err(), "resolution errors must abort the build");
    Ok(())
}

#[rstest]
fn explicit_user_home_ignores_the_environment() -> Result<()> {
    let _scope = UserDirsScope::cleared().home("not/absolute");
    let path = SearchPath::builder(ENVIRONMENT_D)
        .clear_system_roots()
        .user_config_home("/explicit")
        .build()?;
    ensure!(dirs(&path) == ["/explicit/environment.d"]);
    Ok(())
}

#[cfg(unix)]
#[rstest]
fn non_utf8_xdg_config_home_is_rejected() -> Result<()> {
    use std::os::unix::ffi::OsStrExt;

    let raw = std::ffi::OsStr::from_bytes(b"/xdg/\xff");
    let _scope = UserDirsScope::cleared().xdg_config_home(raw);
    ensure!(matches!(
        user_config_home(),
        Err(GeneratorError::PathResolution {
            variable: "XDG_CONFIG_HOME",
            ..
        })
    ));
    Ok(())
}

#[test]
fn prepend_moves_existing_entry_to_the_front() {
    let mut path = SearchPath::from_dirs(["/a", "/b", "/c"]);
    path.prepend(Utf8PathBuf::from("/c"));
    assert_eq!(dirs(&path), ["/c", "/a", "/b"]);
}

#[test]
fn empty_directories_are_ignored() {
    let mut path = SearchPath::from_dirs(["", "/a"]);
    path.prepend(Utf8PathBuf::new());
    assert!(!path.push_unique(Utf8PathBuf::from("/a")));
    assert_eq!(dirs(&path), ["/a"]);
}
