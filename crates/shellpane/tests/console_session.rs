//! End-to-end console behaviour with a real `sh` behind it.
#![cfg(unix)]

mod common;

use common::harness::{sh_config, ConsoleTestHarness};
use crossterm::event::{KeyCode, KeyModifiers};
use shellpane::app::AppOptions;
use shellpane::session::SessionStore;
use shellpane_core::ProcessState;

#[test]
fn test_startup_banner_and_status_line() {
    let mut harness = ConsoleTestHarness::new(80, 10);
    let screen = harness.screen_to_string();

    assert!(screen.contains("[INFO] Shell started."), "Screen:\n{}", screen);
    assert!(screen.contains("shell: running"), "Screen:\n{}", screen);
}

#[test]
fn test_submitted_command_is_echoed_and_run() {
    let mut harness = ConsoleTestHarness::new(80, 10);
    harness.run_command("echo hello");

    assert!(harness.scrollback().contains("echo hello\n"));
    harness.wait_for_output("hello\nhello\n");

    let history: Vec<&str> = harness.app().console().history().iter().collect();
    assert_eq!(history, vec!["echo hello"]);
    assert_eq!(harness.app().console().pending(), "");
}

#[test]
fn test_frozen_output_cannot_be_edited() {
    let mut harness = ConsoleTestHarness::new(80, 10);
    harness.run_command("echo output");
    harness.wait_for_output("output\noutput\n");
    let before = harness.scrollback();

    // Nothing pending: Backspace would reach into the output
    assert!(!harness.send_key(KeyCode::Backspace, KeyModifiers::NONE));
    assert!(!harness.send_key(KeyCode::Left, KeyModifiers::NONE));
    assert_eq!(harness.scrollback(), before);

    // Clicking on old output puts the cursor back at the prompt
    harness.type_text("ab");
    harness.render();
    harness.click(0, 0);
    harness.type_text("X");
    assert_eq!(harness.app().console().pending(), "Xab");
    assert_eq!(harness.scrollback(), before);
}

#[test]
fn test_click_places_cursor_in_pending_line() {
    let mut harness = ConsoleTestHarness::new(80, 10);
    harness.type_text("abc");
    harness.render();

    // Row 0 holds the banner, the pending line sits on row 1
    assert!(harness.click(1, 1));
    harness.type_text("-");
    assert_eq!(harness.app().console().pending(), "a-bc");
}

#[test]
fn test_history_recall_with_arrows() {
    let mut harness = ConsoleTestHarness::new(80, 10);
    harness.run_command("echo one");
    harness.run_command("echo two");

    harness.send_key(KeyCode::Up, KeyModifiers::NONE);
    assert_eq!(harness.app().console().pending(), "echo two");
    harness.send_key(KeyCode::Up, KeyModifiers::NONE);
    assert_eq!(harness.app().console().pending(), "echo one");
    harness.send_key(KeyCode::Down, KeyModifiers::NONE);
    assert_eq!(harness.app().console().pending(), "echo two");
    harness.send_key(KeyCode::Down, KeyModifiers::NONE);
    assert_eq!(harness.app().console().pending(), "");
}

#[test]
fn test_shell_exit_is_announced() {
    let mut harness = ConsoleTestHarness::new(80, 10);
    harness.run_command("exit 4");
    harness.wait_for_output("[INFO] Shell exited with code 4.");
    assert_eq!(
        harness.app().console().process_state(),
        ProcessState::Exited(Some(4))
    );

    // Further commands are echoed but report the dead shell
    harness.run_command("echo anyone");
    harness.wait_for_output("[ERROR] shell process is not running");
}

#[test]
fn test_spawn_failure_is_shown_in_console() {
    let mut config = sh_config();
    config.console.shell = Some("definitely-not-a-shell-xyz".to_string());
    let mut harness = ConsoleTestHarness::with_options(80, 10, config, AppOptions::default());

    let scrollback = harness.scrollback();
    assert!(scrollback.starts_with("[ERROR] failed to start shell 'definitely-not-a-shell-xyz'"));
    let screen = harness.screen_to_string();
    assert!(screen.contains("shell: exited"), "Screen:\n{}", screen);
}

#[test]
fn test_ctrl_l_clears_scrollback_but_keeps_pending() {
    let mut harness = ConsoleTestHarness::new(80, 10);
    harness.run_command("echo gone");
    harness.wait_for_output("gone\ngone\n");
    harness.type_text("next");

    assert!(harness.send_key(KeyCode::Char('l'), KeyModifiers::CONTROL));
    assert_eq!(harness.scrollback(), "");
    assert_eq!(harness.app().console().boundary().offset(), 0);
    assert_eq!(harness.app().console().pending(), "next");
}

#[test]
fn test_ctrl_t_toggles_theme_and_ctrl_q_quits() {
    let mut harness = ConsoleTestHarness::new(80, 10);
    let initial = harness.app().theme();
    harness.send_key(KeyCode::Char('t'), KeyModifiers::CONTROL);
    assert_eq!(harness.app().theme(), initial.toggle());

    assert!(!harness.app().should_quit());
    harness.send_key(KeyCode::Char('q'), KeyModifiers::CONTROL);
    assert!(harness.app().should_quit());
}

#[test]
fn test_page_up_scrolls_back() {
    let mut harness = ConsoleTestHarness::new(100, 6);
    harness.run_command("for i in 1 2 3 4 5 6 7 8 9 10; do echo line$i; done");
    harness.wait_for_output("line10\n");
    harness.render();

    harness.send_key(KeyCode::PageUp, KeyModifiers::NONE);
    harness.render();
    assert!(harness.app().scroll() > 0);
    let screen = harness.screen_to_string();
    assert!(screen.contains("scrolled back"), "Screen:\n{}", screen);

    // Typing jumps back to the prompt
    harness.type_text("x");
    assert_eq!(harness.app().scroll(), 0);
}

#[test]
fn test_project_dir_changes_shell_directory() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("project-marker"), "").unwrap();

    let options = AppOptions {
        project_dir: Some(dir.path().to_path_buf()),
        session: None,
    };
    let mut harness = ConsoleTestHarness::with_options(80, 10, sh_config(), options);
    harness.run_command("ls");
    harness.wait_for_output("project-marker");

    // The cd is not part of the user's history
    let history: Vec<&str> = harness.app().console().history().iter().collect();
    assert_eq!(history, vec!["ls"]);
}

#[test]
fn test_history_is_restored_from_session() {
    let dir = tempfile::tempdir().unwrap();
    let session_path = dir.path().join("session.json");

    {
        let options = AppOptions {
            project_dir: None,
            session: Some(SessionStore::new(session_path.clone())),
        };
        let mut harness = ConsoleTestHarness::with_options(80, 10, sh_config(), options);
        harness.run_command("echo first");
        harness.run_command("echo second");
        harness.app_mut().shutdown();
    }
    assert!(session_path.exists());

    let options = AppOptions {
        project_dir: None,
        session: Some(SessionStore::new(session_path)),
    };
    let mut harness = ConsoleTestHarness::with_options(80, 10, sh_config(), options);
    let history: Vec<&str> = harness.app().console().history().iter().collect();
    assert_eq!(history, vec!["echo first", "echo second"]);

    harness.send_key(KeyCode::Up, KeyModifiers::NONE);
    assert_eq!(harness.app().console().pending(), "echo second");
}
