use std::env;
use std::sync::{Mutex, OnceLock};

use rosrustext_ipc::config::{ENV_BUFFER_TYPE, ENV_DEPTH, ENV_HISTORY};
use rosrustext_ipc::{BufferType, CapacityPolicy, Error};
use rosrustext_ipc_probe::config::{Config, DEFAULT_SUBSCRIPTIONS, DEFAULT_TOPIC};

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(())).lock().expect("lock")
}

fn clear_env() {
    for key in [ENV_HISTORY, ENV_DEPTH, ENV_BUFFER_TYPE, "ROSRUSTEXT_IPC_TOPIC"] {
        env::remove_var(key);
    }
}

#[test]
fn defaults_without_flags() {
    let _guard = env_lock();
    clear_env();

    let config = Config::from_args_iter(["bin"]).unwrap();
    assert_eq!(config.topic, DEFAULT_TOPIC);
    assert_eq!(config.subscriptions, DEFAULT_SUBSCRIPTIONS);
    assert_eq!(config.ipc.buffer_type, BufferType::CallbackDefault);
}

#[test]
fn flags_override_env() {
    let _guard = env_lock();
    clear_env();
    env::set_var(ENV_DEPTH, "7");
    env::set_var(ENV_BUFFER_TYPE, "shared");

    let config = Config::from_args_iter(["bin", "--depth", "2", "--topic=/scan"]).unwrap();
    assert_eq!(config.ipc.history.capacity(), Some(2));
    assert_eq!(config.ipc.buffer_type, BufferType::SharedPtr);
    assert_eq!(config.topic, "/scan");

    let config = Config::from_args_iter(["bin", "--keep-all"]).unwrap();
    assert_eq!(config.ipc.history, CapacityPolicy::Unbounded);

    clear_env();
}

#[test]
fn zero_depth_flag_is_rejected() {
    let _guard = env_lock();
    clear_env();

    assert!(Config::from_args_iter(["bin", "--depth", "0"]).is_err());
}

#[test]
fn malformed_count_flags_are_rejected() {
    let _guard = env_lock();
    clear_env();

    for args in [
        &["bin", "--depth", "ten"][..],
        &["bin", "--depth=-1"][..],
        &["bin", "--depth"][..],
        &["bin", "--subscriptions", "two"][..],
        &["bin", "--messages", ""][..],
    ] {
        assert!(
            matches!(Config::from_args_iter(args), Err(Error::Config(_))),
            "{args:?} should be rejected"
        );
    }

    let config =
        Config::from_args_iter(["bin", "--subscriptions", "3", "--messages", " 4 "]).unwrap();
    assert_eq!(config.subscriptions, 3);
    assert_eq!(config.messages, 4);
}
