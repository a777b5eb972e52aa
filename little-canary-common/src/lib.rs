// ABOUTME: defines the shared canary action and audit record types used by lc and its consumers.
// ABOUTME: provides argument parsing that turns raw words into a closed action enumeration or a usage error.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Name of the wrapper shown in usage messages.
pub const WRAPPER_NAME: &str = "lc";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Proc(ProcAction),
    File(FileAction),
    Net(NetAction),
    Version,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcAction {
    pub command: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileAction {
    Create { path: String },
    Delete { path: String },
    Modify { path: String, content: String },
}

impl FileAction {
    pub fn path(&self) -> &str {
        match self {
            FileAction::Create { path } | FileAction::Delete { path } | FileAction::Modify { path, .. } => path,
        }
    }

    pub fn activity(&self) -> FileActivity {
        match self {
            FileAction::Create { .. } => FileActivity::Create,
            FileAction::Delete { .. } => FileActivity::Delete,
            FileAction::Modify { .. } => FileActivity::Modify,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetAction {
    pub protocol: Protocol,
    pub host: String,
    pub port: String,
    pub data: String,
}

impl NetAction {
    /// `host:port` exactly as it was given on the command line.
    pub fn destination(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FileActivity {
    Create,
    Delete,
    Modify,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Protocol {
    Tcp,
    Udp,
}

/// Malformed invocation shapes, one per usage line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Usage {
    Actions,
    Proc,
    Net,
    File,
    FileCreate,
    FileDelete,
    FileModify,
}

impl Usage {
    pub fn shape(self) -> &'static str {
        match self {
            Usage::Actions => "[proc|file|net|version] ...",
            Usage::Proc => "proc [command ...]",
            Usage::Net => "net [tcp|udp] [host] [port] [data ...]",
            Usage::File => "file [create|modify|delete] ...",
            Usage::FileCreate => "file create [filename]",
            Usage::FileDelete => "file delete [filename]",
            Usage::FileModify => "file modify [filename] [contents ...]",
        }
    }
}

impl fmt::Display for Usage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "usage: {} {}", WRAPPER_NAME, self.shape())
    }
}

/// Turns the words following the program name into an action.
///
/// Arity is checked before any sub-verb is interpreted, so `net foo a b`
/// reports the `net` usage rather than an unknown protocol. Trailing words
/// are rejoined with single spaces.
pub fn parse_action<S: AsRef<str>>(args: &[S]) -> Result<Action, Usage> {
    let args: Vec<&str> = args.iter().map(AsRef::as_ref).collect();

    let verb = match args.first() {
        Some(verb) => *verb,
        None => return Err(Usage::Actions),
    };

    match verb {
        "proc" => {
            if args.len() < 2 {
                return Err(Usage::Proc);
            }
            Ok(Action::Proc(ProcAction {
                command: args[1..].join(" "),
            }))
        }
        "net" => {
            if args.len() < 5 {
                return Err(Usage::Net);
            }
            let protocol = match args[1] {
                "tcp" => Protocol::Tcp,
                "udp" => Protocol::Udp,
                _ => return Err(Usage::Net),
            };
            Ok(Action::Net(NetAction {
                protocol,
                host: args[2].to_string(),
                port: args[3].to_string(),
                data: args[4..].join(" "),
            }))
        }
        "file" => {
            if args.len() < 2 {
                return Err(Usage::File);
            }
            match args[1] {
                "create" => {
                    if args.len() != 3 {
                        return Err(Usage::FileCreate);
                    }
                    Ok(Action::File(FileAction::Create {
                        path: args[2].to_string(),
                    }))
                }
                "delete" => {
                    if args.len() != 3 {
                        return Err(Usage::FileDelete);
                    }
                    Ok(Action::File(FileAction::Delete {
                        path: args[2].to_string(),
                    }))
                }
                "modify" => {
                    if args.len() < 4 {
                        return Err(Usage::FileModify);
                    }
                    Ok(Action::File(FileAction::Modify {
                        path: args[2].to_string(),
                        content: args[3..].join(" "),
                    }))
                }
                _ => Err(Usage::File),
            }
        }
        "version" => Ok(Action::Version),
        _ => Err(Usage::Actions),
    }
}

/// One line of the audit log.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AuditRecord {
    pub timestamp: String,
    pub username: String,
    pub proc_name: String,
    pub proc_command: String,
    pub pid: u32,
    #[serde(flatten)]
    pub activity: Activity,
}

/// Action specific part of an audit record, tagged by `type`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Activity {
    Proc,
    File {
        activity: FileActivity,
        path: String,
    },
    Net {
        protocol: Protocol,
        destination: String,
        source: String,
        data_size: u64,
    },
}

pub fn parse_audit_line(line: &str) -> Result<AuditRecord, serde_json::Error> {
    serde_json::from_str(line)
}
