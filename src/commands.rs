//! Available commands and autocomplete logic

use crate::collection::Collection;

#[derive(Debug, Clone)]
pub struct Command {
  pub name: &'static str,
  pub aliases: &'static [&'static str],
  pub description: &'static str,
}

/// All available commands
pub const COMMANDS: &[Command] = &[
  Command {
    name: "customers",
    aliases: &["c", "customer"],
    description: "Customer accounts",
  },
  Command {
    name: "suppliers",
    aliases: &["s", "supplier", "vendors"],
    description: "Supplier accounts",
  },
  Command {
    name: "brands",
    aliases: &["b", "brand"],
    description: "Product brands",
  },
  Command {
    name: "categories",
    aliases: &["cat", "category"],
    description: "Product categories",
  },
  Command {
    name: "products",
    aliases: &["p", "product", "stock"],
    description: "Product catalogue",
  },
  Command {
    name: "variations",
    aliases: &["v", "variation", "var"],
    description: "Product variations",
  },
  Command {
    name: "quit",
    aliases: &["q", "exit"],
    description: "Exit stockroom",
  },
];

/// What a resolved command asks the app to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandAction {
  Open(Collection),
  Quit,
}

/// Map a submitted command name to its action.
pub fn resolve(name: &str) -> Option<CommandAction> {
  if name == "quit" {
    return Some(CommandAction::Quit);
  }
  Collection::from_name(name).map(CommandAction::Open)
}

/// Get autocomplete suggestions for a given input
pub fn get_suggestions(input: &str) -> Vec<&'static Command> {
  let input_lower = input.to_lowercase();

  if input_lower.is_empty() {
    return COMMANDS.iter().collect();
  }

  let mut matches: Vec<(&Command, u32)> = Vec::new();

  for cmd in COMMANDS {
    let priority = if cmd.name == input_lower {
      0
    } else if cmd.aliases.contains(&input_lower.as_str()) {
      1
    } else if cmd.name.starts_with(&input_lower) {
      2
    } else if cmd.aliases.iter().any(|a| a.starts_with(&input_lower)) {
      3
    } else if cmd.name.contains(&input_lower) {
      4
    } else if cmd.aliases.iter().any(|a| a.contains(&input_lower)) {
      5
    } else {
      continue;
    };
    matches.push((cmd, priority));
  }

  // Stable sort keeps declaration order within a priority
  matches.sort_by_key(|(_, priority)| *priority);

  matches.into_iter().map(|(cmd, _)| cmd).collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_empty_input_returns_all() {
    let suggestions = get_suggestions("");
    assert_eq!(suggestions.len(), COMMANDS.len());
  }

  #[test]
  fn test_exact_match() {
    let suggestions = get_suggestions("products");
    assert_eq!(suggestions[0].name, "products");
  }

  #[test]
  fn test_alias_match() {
    assert_eq!(get_suggestions("c")[0].name, "customers");
    assert_eq!(get_suggestions("cat")[0].name, "categories");
    // Exact alias wins over the "vendors" prefix
    assert_eq!(get_suggestions("v")[0].name, "variations");
  }

  #[test]
  fn test_prefix_match() {
    assert_eq!(get_suggestions("sup")[0].name, "suppliers");
  }

  #[test]
  fn test_fuzzy_match() {
    assert_eq!(get_suggestions("ories")[0].name, "categories");
  }

  #[test]
  fn test_every_collection_has_a_command() {
    for collection in Collection::ALL {
      assert_eq!(
        resolve(collection.name()),
        Some(CommandAction::Open(*collection))
      );
    }
    assert_eq!(resolve("quit"), Some(CommandAction::Quit));
    assert_eq!(resolve("nope"), None);
  }
}
