//! Huawei VRP dialect definition.
//!
//! Covers VRP5/VRP8 routers and switches (NE, CE, S and AR series).
//!
//! # Prompt Examples
//!
//! ```text
//! <PE1>                                  # user view
//! <PE1>display version                   # user view with command
//! [PE1]                                  # system view
//! [~PE1]                                 # VRP8 system view, two-stage commit
//! [*PE1-GigabitEthernet0/0/1]            # VRP8 interface view, uncommitted
//! ```
//!
//! Operational commands start with `display`, which the CLI accepts down to
//! `dis`. `dir` lists flash storage and is used for disk samples.

use crate::dialect::{Dialect, PromptLevel};

/// Dialect name for Huawei VRP.
pub const DIALECT_NAME: &str = "huawei_vrp";

/// Create the Huawei VRP dialect definition.
pub fn dialect() -> Dialect {
    // User view - "<host>" prompt
    let user_view = PromptLevel::new("user_view", r"^\s*<(?P<host>[A-Za-z0-9][^<>\s]*)>")
        .expect("user view prompt pattern is valid");

    // System and sub views - "[host]", "[~host]", "[*host-Interface]"
    // Names with spaces are section titles in elabel output, not prompts.
    let system_view = PromptLevel::new(
        "system_view",
        r"^\s*\[[~*]{0,2}(?P<host>[A-Za-z0-9][^\[\]\s]*)\]",
    )
    .expect("system view prompt pattern is valid")
    .with_not_contains("=");

    Dialect::new(DIALECT_NAME)
        .with_prompt(user_view)
        .with_prompt(system_view)
        .with_keyword("display", 3)
        .with_keyword("dir", 3)
        .with_system_message("Info:")
        .with_system_message("Warning:")
        .with_system_message("Error:")
        .with_system_message("Notice:")
        .with_system_message("^")
        .with_system_message("The current login time")
        .with_system_message("The last login")
        .with_pager_marker("---- More ----")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_huawei_vrp_dialect() {
        let dialect = dialect();
        assert_eq!(dialect.name, "huawei_vrp");
        assert_eq!(dialect.prompt_levels.len(), 2);
        assert!(dialect.prompt_levels.contains_key("user_view"));
        assert!(dialect.prompt_levels.contains_key("system_view"));
        assert_eq!(dialect.command_keywords.len(), 2);
    }

    #[test]
    fn test_user_view_prompt_match() {
        let dialect = dialect();
        let user = dialect.get_prompt("user_view").unwrap();

        assert!(user.matches("<PE1>"));
        assert!(user.matches("<PE1>display version"));
        assert!(user.matches("<HUAWEI-CORE-01>dis cur"));
        assert_eq!(user.host("<HUAWEI-CORE-01>dis cur"), Some("HUAWEI-CORE-01"));

        // Not a prompt
        assert!(!user.matches("display version"));
        assert!(!user.matches("<>"));
    }

    #[test]
    fn test_system_view_prompt_match() {
        let dialect = dialect();
        let system = dialect.get_prompt("system_view").unwrap();

        assert!(system.matches("[PE1]"));
        assert!(system.matches("[~PE1]display this"));
        assert!(system.matches("[*PE1-GigabitEthernet0/0/1]"));
        assert_eq!(system.host("[~PE1]"), Some("PE1"));

        // Elabel section titles
        assert!(!system.matches("[Board Properties]"));
        assert!(!system.matches("/$[Board Integration Version]"));
    }

    #[test]
    fn test_system_messages() {
        let dialect = dialect();
        assert!(dialect.is_system_message("Info: The max number of VTY users is 21."));
        assert!(dialect.is_system_message("Warning: The current configuration will be written."));
        assert!(dialect.is_system_message("               ^"));
        assert!(!dialect.is_system_message("display version"));
    }
}
