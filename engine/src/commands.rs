//! Command registry backing the suggestion overlay.
//!
//! The registry only knows names and descriptions. What a command does is up
//! to the host.

use crate::handler::SuggestionSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSpec {
    pub name: &'static str,
    pub usage: &'static str,
    pub description: &'static str,
}

const COMMAND_SPECS: &[CommandSpec] = &[
    CommandSpec {
        name: "help",
        usage: "help",
        description: "Show available commands",
    },
    CommandSpec {
        name: "clear",
        usage: "clear",
        description: "Clear the transcript",
    },
    CommandSpec {
        name: "model",
        usage: "model <name>",
        description: "Change the model",
    },
    CommandSpec {
        name: "file",
        usage: "file <path>",
        description: "Set the active file",
    },
    CommandSpec {
        name: "mcp",
        usage: "mcp <status>",
        description: "Set the MCP status label",
    },
    CommandSpec {
        name: "confirm",
        usage: "confirm",
        description: "Open a sample confirmation dialog",
    },
    CommandSpec {
        name: "quit",
        usage: "quit",
        description: "Exit the application",
    },
];

#[derive(Debug, Clone)]
pub struct CommandRegistry {
    prefix: String,
    specs: Vec<CommandSpec>,
}

impl CommandRegistry {
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            specs: Vec::new(),
        }
    }

    /// Registry holding the built-in command table.
    #[must_use]
    pub fn builtin(prefix: impl Into<String>) -> Self {
        let mut registry = Self::new(prefix);
        registry.specs.extend_from_slice(COMMAND_SPECS);
        registry
    }

    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    #[must_use]
    pub fn specs(&self) -> &[CommandSpec] {
        &self.specs
    }

    /// Case-insensitive prefix match of `input` against `<prefix><name>`,
    /// sorted alphabetically.
    #[must_use]
    pub fn matches(&self, input: &str) -> Vec<String> {
        let Some(rest) = input.strip_prefix(self.prefix.as_str()) else {
            return Vec::new();
        };
        let needle = rest.to_lowercase();
        let mut found: Vec<String> = self
            .specs
            .iter()
            .filter(|spec| spec.name.to_lowercase().starts_with(&needle))
            .map(|spec| format!("{}{}", self.prefix, spec.name))
            .collect();
        found.sort();
        found
    }

    /// One `usage - description` line per command, sorted by name.
    #[must_use]
    pub fn help_summary(&self) -> String {
        let mut specs: Vec<&CommandSpec> = self.specs.iter().collect();
        specs.sort_by_key(|spec| spec.name);
        let labels: Vec<String> = specs
            .iter()
            .map(|spec| format!("{}{} - {}", self.prefix, spec.usage, spec.description))
            .collect();
        labels.join("\n")
    }
}

impl SuggestionSource for CommandRegistry {
    fn suggestions(&self, input: &str) -> Vec<String> {
        self.matches(input)
    }
}

#[cfg(test)]
mod tests {
    use super::{CommandRegistry, CommandSpec};

    #[test]
    fn prefix_match_is_case_insensitive_and_sorted() {
        let registry = CommandRegistry::builtin("/");
        assert_eq!(registry.matches("/"), [
            "/clear", "/confirm", "/file", "/help", "/mcp", "/model", "/quit"
        ]);
        assert_eq!(registry.matches("/C"), ["/clear", "/confirm"]);
        assert_eq!(registry.matches("/mo"), ["/model"]);
    }

    #[test]
    fn non_matching_input_yields_nothing() {
        let registry = CommandRegistry::builtin("/");
        assert!(registry.matches("help").is_empty());
        assert!(registry.matches("/zzz").is_empty());
        assert!(registry.matches("/model gpt").is_empty());
    }

    #[test]
    fn custom_prefix() {
        let registry = CommandRegistry::builtin(":");
        assert_eq!(registry.matches(":q"), [":quit"]);
        assert!(registry.matches("/q").is_empty());
    }
}
