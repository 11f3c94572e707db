//! Terminal presentation adapter.
//!
//! Implements the application layer's presentation ports for a plain
//! terminal: pairing modals are rendered as framed text blocks on stdout,
//! notices as single prefixed lines, and operator decisions are read from
//! stdin one line at a time.  Nothing else in the crate knows it is talking
//! to a terminal; swapping in a graphical surface means re-implementing
//! [`ModalSurface`] and [`Notifier`] only.

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::debug;

use crate::application::ports::{ModalSurface, Notifier};
use crate::domain::{ModalContent, ModalMode, OperatorDecision};

// ── Modal rendering ───────────────────────────────────────────────────────────

/// Renders pairing modals as framed blocks on stdout.
#[derive(Debug, Default)]
pub struct TerminalModal;

impl ModalSurface for TerminalModal {
    fn open(&self, mode: ModalMode, content: ModalContent) {
        let controls = match mode {
            ModalMode::Informational => "[c] cancel",
            ModalMode::Decision => "[y] confirm  [n] reject",
        };
        println!();
        println!("┌──────────────────────────────────────────┐");
        println!("│ {} ({})", content.heading, content.device_label);
        println!("│ {}", content.prompt);
        println!("│");
        println!("│     {}", content.code);
        println!("│");
        println!("│ {controls}");
        println!("└──────────────────────────────────────────┘");
    }

    fn close(&self) {
        println!("(pairing prompt closed)");
    }
}

// ── Notices ───────────────────────────────────────────────────────────────────

/// Prints transient operator notices as prefixed lines.
#[derive(Debug, Default)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notice(&self, text: &str) {
        println!("*** {text}");
    }
}

// ── Operator input ────────────────────────────────────────────────────────────

/// One line of operator input, parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperatorInput {
    /// Answer to the open pairing modal: `y`/`yes`, `n`/`no`, `c`/`cancel`.
    Decision(OperatorDecision),
    /// Console command, e.g. `pair <device>` or `scan on`.
    Command(ConsoleCommand),
}

/// Console commands typed at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    /// `pair <device>` — pair with a discovered device.
    Pair(String),
    /// `connect <device>` — connect an already-paired device.
    Connect(String),
    /// `disconnect <device>` — disconnect without unpairing.
    Disconnect(String),
    /// `remove <device>` — unpair and forget.
    Remove(String),
    /// `scan on` / `scan off` — toggle hub-side discovery.
    Scan(bool),
    /// `discoverable on` / `discoverable off` — toggle the pairing window.
    Discoverable(bool),
    /// `capture <id> on|off` — toggle exclusive capture for an input device.
    Capture(String, bool),
    /// `filter <id> <filter>` — assign a report filter to an input device.
    Filter(String, String),
    /// `password <current> <new>` — change the hub's operator password.
    Password(String, String),
    /// `devices` — print the current inventory snapshots.
    Devices,
    /// `refresh` — force a control-channel teardown and redial.
    Refresh,
    /// `restart` — restart the hub's bridge service.
    RestartService,
    /// `reboot` — reboot the hub machine.
    Reboot,
}

/// Reads operator input from stdin until it closes.
///
/// One input per line; unrecognised lines get a hint and are dropped here.
/// Whether a decision is stale is the agent's call, not this reader's.
pub async fn read_operator_input(inputs: mpsc::UnboundedSender<OperatorInput>) {
    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    while let Ok(Some(line)) = lines.next_line().await {
        let Some(input) = parse_input(&line) else {
            if !line.trim().is_empty() {
                println!("(unrecognised input; try: y/n/c, pair <device>, scan on, devices, refresh)");
            }
            continue;
        };
        if inputs.send(input).is_err() {
            debug!("input consumer gone; stopping stdin reader");
            break;
        }
    }
    debug!("stdin closed; operator input reader stopping");
}

fn parse_input(line: &str) -> Option<OperatorInput> {
    if let Some(decision) = parse_decision(line) {
        return Some(OperatorInput::Decision(decision));
    }
    parse_command(line).map(OperatorInput::Command)
}

fn parse_decision(line: &str) -> Option<OperatorDecision> {
    match line.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Some(OperatorDecision::Confirm),
        "n" | "no" => Some(OperatorDecision::Reject),
        "c" | "cancel" => Some(OperatorDecision::Cancel),
        _ => None,
    }
}

fn parse_command(line: &str) -> Option<ConsoleCommand> {
    let mut words = line.split_whitespace();
    let verb = words.next()?.to_ascii_lowercase();
    let first = words.next();
    let second = words.next();
    if words.next().is_some() {
        return None;
    }

    match (verb.as_str(), first, second) {
        ("pair", Some(device), None) => Some(ConsoleCommand::Pair(device.to_string())),
        ("connect", Some(device), None) => Some(ConsoleCommand::Connect(device.to_string())),
        ("disconnect", Some(device), None) => Some(ConsoleCommand::Disconnect(device.to_string())),
        ("remove", Some(device), None) => Some(ConsoleCommand::Remove(device.to_string())),
        ("scan", Some(toggle), None) => parse_toggle(toggle).map(ConsoleCommand::Scan),
        ("discoverable", Some(toggle), None) => {
            parse_toggle(toggle).map(ConsoleCommand::Discoverable)
        }
        ("capture", Some(id), Some(toggle)) => {
            parse_toggle(toggle).map(|on| ConsoleCommand::Capture(id.to_string(), on))
        }
        ("filter", Some(id), Some(filter)) => {
            Some(ConsoleCommand::Filter(id.to_string(), filter.to_string()))
        }
        ("password", Some(current), Some(new)) => {
            Some(ConsoleCommand::Password(current.to_string(), new.to_string()))
        }
        ("devices", None, None) => Some(ConsoleCommand::Devices),
        ("refresh", None, None) => Some(ConsoleCommand::Refresh),
        ("restart", None, None) => Some(ConsoleCommand::RestartService),
        ("reboot", None, None) => Some(ConsoleCommand::Reboot),
        _ => None,
    }
}

fn parse_toggle(word: &str) -> Option<bool> {
    match word.to_ascii_lowercase().as_str() {
        "on" => Some(true),
        "off" => Some(false),
        _ => None,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decision_accepts_short_and_long_forms() {
        assert_eq!(parse_decision("y"), Some(OperatorDecision::Confirm));
        assert_eq!(parse_decision("yes"), Some(OperatorDecision::Confirm));
        assert_eq!(parse_decision("n"), Some(OperatorDecision::Reject));
        assert_eq!(parse_decision("no"), Some(OperatorDecision::Reject));
        assert_eq!(parse_decision("c"), Some(OperatorDecision::Cancel));
        assert_eq!(parse_decision("cancel"), Some(OperatorDecision::Cancel));
    }

    #[test]
    fn test_parse_decision_ignores_case_and_whitespace() {
        assert_eq!(parse_decision("  YES  "), Some(OperatorDecision::Confirm));
        assert_eq!(parse_decision("\tN"), Some(OperatorDecision::Reject));
    }

    #[test]
    fn test_parse_decision_rejects_unknown_input() {
        assert_eq!(parse_decision(""), None);
        assert_eq!(parse_decision("maybe"), None);
        assert_eq!(parse_decision("yn"), None);
    }

    #[test]
    fn test_parse_command_device_verbs_take_an_object_path() {
        assert_eq!(
            parse_command("pair /org/bluez/hci0/dev_AA_BB"),
            Some(ConsoleCommand::Pair("/org/bluez/hci0/dev_AA_BB".to_string()))
        );
        assert_eq!(
            parse_command("remove D1"),
            Some(ConsoleCommand::Remove("D1".to_string()))
        );
        // A device verb without its argument is not a command.
        assert_eq!(parse_command("pair"), None);
    }

    #[test]
    fn test_parse_command_toggles() {
        assert_eq!(parse_command("scan on"), Some(ConsoleCommand::Scan(true)));
        assert_eq!(parse_command("scan off"), Some(ConsoleCommand::Scan(false)));
        assert_eq!(
            parse_command("discoverable ON"),
            Some(ConsoleCommand::Discoverable(true))
        );
        assert_eq!(parse_command("scan maybe"), None);
    }

    #[test]
    fn test_parse_command_capture_and_filter_take_two_arguments() {
        assert_eq!(
            parse_command("capture 1234:abcd on"),
            Some(ConsoleCommand::Capture("1234:abcd".to_string(), true))
        );
        assert_eq!(
            parse_command("filter 1234:abcd Mouse"),
            Some(ConsoleCommand::Filter("1234:abcd".to_string(), "Mouse".to_string()))
        );
        assert_eq!(parse_command("capture 1234:abcd"), None);
    }

    #[test]
    fn test_parse_command_bare_verbs() {
        assert_eq!(parse_command("devices"), Some(ConsoleCommand::Devices));
        assert_eq!(parse_command("refresh"), Some(ConsoleCommand::Refresh));
        assert_eq!(parse_command("restart"), Some(ConsoleCommand::RestartService));
        assert_eq!(parse_command("reboot"), Some(ConsoleCommand::Reboot));
        // Trailing junk invalidates the line.
        assert_eq!(parse_command("reboot now please"), None);
    }

    #[test]
    fn test_parse_input_prefers_decisions_over_commands() {
        assert_eq!(
            parse_input("y"),
            Some(OperatorInput::Decision(OperatorDecision::Confirm))
        );
        assert_eq!(
            parse_input("devices"),
            Some(OperatorInput::Command(ConsoleCommand::Devices))
        );
        assert_eq!(parse_input("   "), None);
    }
}
