use crate::utils::error::CommandError;

/// A parsed protocol command.
///
/// Commands arrive as space-delimited tokens with a case-sensitive keyword in
/// position 0. The mutating commands (CREATE, PUBLISH, SUBSCRIBE, UNSUBSCRIBE,
/// DELETE) are replicated to peer brokers after successful local application;
/// the query commands (SHOW, DISPLAY, CURRENT) are answered locally only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Create {
        id: String,
        name: String,
        publisher: String,
    },
    Publish {
        id: String,
        body: String,
    },
    Subscribe {
        id: String,
        subscriber: String,
    },
    Unsubscribe {
        id: String,
        subscriber: String,
    },
    Delete {
        id: String,
    },
    Show {
        publisher: String,
    },
    Display,
    Current {
        subscriber: String,
    },
}

impl Command {
    /// Parses a single protocol line.
    ///
    /// Token counts are strict except for PUBLISH, whose body may contain
    /// spaces and is rejoined from every token after the topic id.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some((&keyword, args)) = tokens.split_first() else {
            return Err(CommandError::Malformed {
                usage: "<COMMAND> [arguments...]",
            });
        };

        match keyword {
            "CREATE" => match args {
                [id, name, publisher] => Ok(Command::Create {
                    id: (*id).to_string(),
                    name: (*name).to_string(),
                    publisher: (*publisher).to_string(),
                }),
                _ => Err(CommandError::Malformed {
                    usage: "CREATE <id> <name> <publisher>",
                }),
            },
            "PUBLISH" => match args {
                [id, body @ ..] if !body.is_empty() => Ok(Command::Publish {
                    id: (*id).to_string(),
                    body: body.join(" "),
                }),
                _ => Err(CommandError::Malformed {
                    usage: "PUBLISH <id> <text...>",
                }),
            },
            "SUBSCRIBE" => match args {
                [id, subscriber] => Ok(Command::Subscribe {
                    id: (*id).to_string(),
                    subscriber: (*subscriber).to_string(),
                }),
                _ => Err(CommandError::Malformed {
                    usage: "SUBSCRIBE <id> <subscriber>",
                }),
            },
            "UNSUBSCRIBE" => match args {
                [id, subscriber] => Ok(Command::Unsubscribe {
                    id: (*id).to_string(),
                    subscriber: (*subscriber).to_string(),
                }),
                _ => Err(CommandError::Malformed {
                    usage: "UNSUBSCRIBE <id> <subscriber>",
                }),
            },
            "DELETE" => match args {
                [id] => Ok(Command::Delete {
                    id: (*id).to_string(),
                }),
                _ => Err(CommandError::Malformed {
                    usage: "DELETE <id>",
                }),
            },
            "SHOW" => match args {
                [publisher] => Ok(Command::Show {
                    publisher: (*publisher).to_string(),
                }),
                _ => Err(CommandError::Malformed {
                    usage: "SHOW <publisher>",
                }),
            },
            "DISPLAY" => {
                if args.is_empty() {
                    Ok(Command::Display)
                } else {
                    Err(CommandError::Malformed { usage: "DISPLAY" })
                }
            }
            "CURRENT" => match args {
                [subscriber] => Ok(Command::Current {
                    subscriber: (*subscriber).to_string(),
                }),
                _ => Err(CommandError::Malformed {
                    usage: "CURRENT <subscriber>",
                }),
            },
            other => Err(CommandError::UnknownCommand {
                keyword: other.to_string(),
            }),
        }
    }

    /// Re-encodes the command as a protocol line.
    pub fn encode(&self) -> String {
        match self {
            Command::Create {
                id,
                name,
                publisher,
            } => format!("CREATE {id} {name} {publisher}"),
            Command::Publish { id, body } => format!("PUBLISH {id} {body}"),
            Command::Subscribe { id, subscriber } => format!("SUBSCRIBE {id} {subscriber}"),
            Command::Unsubscribe { id, subscriber } => format!("UNSUBSCRIBE {id} {subscriber}"),
            Command::Delete { id } => format!("DELETE {id}"),
            Command::Show { publisher } => format!("SHOW {publisher}"),
            Command::Display => "DISPLAY".to_string(),
            Command::Current { subscriber } => format!("CURRENT {subscriber}"),
        }
    }

    /// Whether the command mutates the topic directory and is therefore
    /// replicated to peers after successful local application.
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            Command::Create { .. }
                | Command::Publish { .. }
                | Command::Subscribe { .. }
                | Command::Unsubscribe { .. }
                | Command::Delete { .. }
        )
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            Command::Create { .. } => "CREATE",
            Command::Publish { .. } => "PUBLISH",
            Command::Subscribe { .. } => "SUBSCRIBE",
            Command::Unsubscribe { .. } => "UNSUBSCRIBE",
            Command::Delete { .. } => "DELETE",
            Command::Show { .. } => "SHOW",
            Command::Display => "DISPLAY",
            Command::Current { .. } => "CURRENT",
        }
    }
}
