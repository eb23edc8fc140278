use std::env;

use rosrustext_ipc_core::intra_process::{BufferType, CapacityPolicy};

use crate::error::{Error, Result};

pub const ENV_HISTORY: &str = "ROSRUSTEXT_IPC_HISTORY";
pub const ENV_DEPTH: &str = "ROSRUSTEXT_IPC_DEPTH";
pub const ENV_BUFFER_TYPE: &str = "ROSRUSTEXT_IPC_BUFFER_TYPE";

pub const DEFAULT_DEPTH: usize = 10;

/// How intra-process buffers are built for new subscriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntraProcessConfig {
    pub history: CapacityPolicy,
    pub buffer_type: BufferType,
}

impl Default for IntraProcessConfig {
    fn default() -> Self {
        Self {
            history: CapacityPolicy::keep_last(DEFAULT_DEPTH)
                .unwrap_or(CapacityPolicy::Unbounded),
            buffer_type: BufferType::CallbackDefault,
        }
    }
}

impl IntraProcessConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(env::vars())
    }

    /// Build from `(name, value)` pairs; unknown names are ignored, unset ones keep defaults.
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut keep_all = false;
        let mut depth = DEFAULT_DEPTH;
        let mut buffer_type = BufferType::CallbackDefault;

        for (key, value) in vars {
            let value = value.as_ref();
            match key.as_ref() {
                ENV_HISTORY => keep_all = parse_history(value)?,
                ENV_DEPTH => {
                    depth = value.trim().parse::<usize>().map_err(|_| {
                        Error::Config(format!("{ENV_DEPTH}: expected a number, got '{value}'"))
                    })?;
                }
                ENV_BUFFER_TYPE => buffer_type = parse_buffer_type(value)?,
                _ => {}
            }
        }

        let history = if keep_all {
            CapacityPolicy::Unbounded
        } else {
            CapacityPolicy::keep_last(depth)?
        };

        Ok(Self {
            history,
            buffer_type,
        })
    }
}

/// Returns true for keep-all.
fn parse_history(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "keep_all" | "all" => Ok(true),
        "keep_last" | "last" => Ok(false),
        other => Err(Error::Config(format!(
            "{ENV_HISTORY}: expected keep_all or keep_last, got '{other}'"
        ))),
    }
}

fn parse_buffer_type(value: &str) -> Result<BufferType> {
    match value.trim().to_ascii_lowercase().as_str() {
        "shared" | "shared_ptr" => Ok(BufferType::SharedPtr),
        "unique" | "unique_ptr" | "owned" => Ok(BufferType::UniquePtr),
        "callback_default" | "default" => Ok(BufferType::CallbackDefault),
        other => Err(Error::Config(format!(
            "{ENV_BUFFER_TYPE}: expected shared, unique or callback_default, got '{other}'"
        ))),
    }
}
