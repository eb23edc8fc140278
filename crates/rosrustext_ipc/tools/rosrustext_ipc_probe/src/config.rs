use std::env;

use rosrustext_ipc::config::IntraProcessConfig;
use rosrustext_ipc::{CapacityPolicy, Error, Result};

pub const DEFAULT_TOPIC: &str = "/rosrustext_ipc_probe";
pub const DEFAULT_SUBSCRIPTIONS: usize = 2;
pub const DEFAULT_MESSAGES: usize = 5;

pub struct Config {
    pub topic: String,
    pub subscriptions: usize,
    pub messages: usize,
    pub ipc: IntraProcessConfig,
}

impl Config {
    pub fn from_args() -> Result<Self> {
        Self::from_args_iter(env::args())
    }

    /// Buffer settings start from the `ROSRUSTEXT_IPC_*` environment; flags override them.
    pub fn from_args_iter<I, S>(iter: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut topic =
            env::var("ROSRUSTEXT_IPC_TOPIC").unwrap_or_else(|_| DEFAULT_TOPIC.to_string());
        let mut subscriptions = DEFAULT_SUBSCRIPTIONS;
        let mut messages = DEFAULT_MESSAGES;
        let mut ipc = IntraProcessConfig::from_env()?;
        let mut depth: Option<usize> = None;
        let mut keep_all = false;

        let mut args = iter.into_iter();
        let _ = args.next();
        while let Some(arg) = args.next() {
            let arg = arg.as_ref();
            match arg {
                "-h" | "--help" => {
                    print_usage();
                    std::process::exit(0);
                }
                "--topic" => {
                    if let Some(value) = args.next() {
                        topic = value.as_ref().to_string();
                    }
                }
                "--subscriptions" => {
                    subscriptions = parse_count(arg, args.next().as_ref().map(AsRef::as_ref))?;
                }
                "--messages" => {
                    messages = parse_count(arg, args.next().as_ref().map(AsRef::as_ref))?;
                }
                "--depth" => {
                    depth = Some(parse_count(arg, args.next().as_ref().map(AsRef::as_ref))?);
                }
                "--keep-all" => {
                    keep_all = true;
                }
                _ if arg.starts_with("--topic=") => {
                    topic = arg["--topic=".len()..].to_string();
                }
                _ if arg.starts_with("--depth=") => {
                    depth = Some(parse_count("--depth", Some(&arg["--depth=".len()..]))?);
                }
                _ => {}
            }
        }

        if keep_all {
            ipc.history = CapacityPolicy::Unbounded;
        } else if let Some(depth) = depth {
            ipc.history = CapacityPolicy::keep_last(depth)?;
        }

        Ok(Self {
            topic,
            subscriptions,
            messages,
            ipc,
        })
    }
}

fn print_usage() {
    println!(
        "rosrustext_ipc_probe [--topic <name>] [--subscriptions <n>] [--messages <n>] [--depth <n> | --keep-all]"
    );
}

fn parse_count(flag: &str, value: Option<&str>) -> Result<usize> {
    let value = value.ok_or_else(|| Error::Config(format!("{flag}: missing value")))?;
    value
        .trim()
        .parse()
        .map_err(|_| Error::Config(format!("{flag}: expected a number, got '{value}'")))
}
