//! Session configuration parsing in debug and release modes.

use std::collections::HashMap;

use mockable::MockEnv;
use rstest::rstest;
use uuid::Uuid;

use super::*;

struct KeyFile(PathBuf);

impl KeyFile {
    fn with_len(len: usize) -> Self {
        let path = std::env::temp_dir().join(format!("taskboard-session-{}", Uuid::new_v4()));
        std::fs::write(&path, vec![b'k'; len]).expect("write key file");
        Self(path)
    }

    fn path(&self) -> String {
        self.0.to_string_lossy().into_owned()
    }
}

impl Drop for KeyFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.0);
    }
}

fn env_from(vars: &[(&str, &str)]) -> MockEnv {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
        .collect();
    let mut env = MockEnv::new();
    env.expect_string()
        .times(0..)
        .returning(move |name| vars.get(name).cloned());
    env
}

fn release_env(key: &KeyFile, overrides: &[(&'static str, &'static str)]) -> MockEnv {
    let path = key.path();
    let mut vars: Vec<(&str, &str)> = vec![
        (KEY_FILE_ENV, path.as_str()),
        (COOKIE_SECURE_ENV, "1"),
        (SAMESITE_ENV, "Strict"),
        (ALLOW_EPHEMERAL_ENV, "0"),
    ];
    for (name, value) in overrides {
        vars.retain(|(existing, _)| existing != name);
        if !value.is_empty() {
            vars.push((name, value));
        }
    }
    env_from(&vars)
}

#[rstest]
fn release_accepts_complete_configuration() {
    let key = KeyFile::with_len(SESSION_KEY_MIN_LEN);
    let settings = session_settings_from_env(&release_env(&key, &[]), BuildMode::Release)
        .expect("valid settings");
    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Strict);
    assert_eq!(settings.key_fingerprint().len(), FINGERPRINT_BYTES * 2);
}

#[rstest]
#[case(COOKIE_SECURE_ENV)]
#[case(SAMESITE_ENV)]
#[case(ALLOW_EPHEMERAL_ENV)]
fn release_rejects_missing_toggle(#[case] name: &'static str) {
    let key = KeyFile::with_len(SESSION_KEY_MIN_LEN);
    let result = session_settings_from_env(&release_env(&key, &[(name, "")]), BuildMode::Release);
    assert!(matches!(
        result,
        Err(SessionConfigError::MissingEnv { name: missing }) if missing == name
    ));
}

#[rstest]
fn release_rejects_unparseable_flag() {
    let key = KeyFile::with_len(SESSION_KEY_MIN_LEN);
    let result = session_settings_from_env(
        &release_env(&key, &[(COOKIE_SECURE_ENV, "maybe")]),
        BuildMode::Release,
    );
    assert!(matches!(
        result,
        Err(SessionConfigError::InvalidEnv { name: COOKIE_SECURE_ENV, .. })
    ));
}

#[rstest]
fn release_rejects_ephemeral_keys() {
    let key = KeyFile::with_len(SESSION_KEY_MIN_LEN);
    let result = session_settings_from_env(
        &release_env(&key, &[(ALLOW_EPHEMERAL_ENV, "yes")]),
        BuildMode::Release,
    );
    assert!(matches!(result, Err(SessionConfigError::EphemeralNotAllowed)));
}

#[rstest]
fn release_rejects_short_key() {
    let key = KeyFile::with_len(16);
    let result = session_settings_from_env(&release_env(&key, &[]), BuildMode::Release);
    assert!(matches!(result, Err(SessionConfigError::KeyTooShort { length: 16, .. })));
}

#[rstest]
fn release_rejects_unreadable_key() {
    let env = env_from(&[
        (KEY_FILE_ENV, "/nonexistent/taskboard/session_key"),
        (COOKIE_SECURE_ENV, "1"),
        (SAMESITE_ENV, "Lax"),
        (ALLOW_EPHEMERAL_ENV, "0"),
    ]);
    let result = session_settings_from_env(&env, BuildMode::Release);
    assert!(matches!(result, Err(SessionConfigError::KeyRead { .. })));
}

#[rstest]
fn release_rejects_same_site_none_without_secure() {
    let key = KeyFile::with_len(SESSION_KEY_MIN_LEN);
    let result = session_settings_from_env(
        &release_env(&key, &[(COOKIE_SECURE_ENV, "0"), (SAMESITE_ENV, "None")]),
        BuildMode::Release,
    );
    assert!(matches!(result, Err(SessionConfigError::InsecureSameSiteNone)));
}

#[rstest]
fn debug_falls_back_to_defaults() {
    let env = env_from(&[(SAMESITE_ENV, "sideways")]);
    let settings = session_settings_from_env(&env, BuildMode::Debug).expect("debug defaults");
    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Lax);
}

#[rstest]
fn release_reads_the_process_environment() {
    let key = KeyFile::with_len(SESSION_KEY_MIN_LEN);
    let path = key.path();
    let _guard = env_lock::lock_env([
        (KEY_FILE_ENV, Some(path.as_str())),
        (COOKIE_SECURE_ENV, Some("true")),
        (SAMESITE_ENV, Some("Lax")),
        (ALLOW_EPHEMERAL_ENV, Some("no")),
    ]);

    let settings = session_settings_from_env(&mockable::DefaultEnv::new(), BuildMode::Release)
        .expect("process environment settings");
    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Lax);
}
