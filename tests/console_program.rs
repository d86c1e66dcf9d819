//! The greeting program run against fake and composite environments.

use tidepool::console::{self, echo, HasConsole, TestConsole};
use tidepool::prelude::*;
use tidepool::{assert_failure, assert_success};

struct AppEnv {
    console: TestConsole,
    greeting: String,
}

impl HasConsole for AppEnv {
    type Service = TestConsole;

    fn console(&self) -> &TestConsole {
        &self.console
    }
}

fn greet() -> Effect<AppEnv, Fault, Unit> {
    console::readln().flat_map(|name| {
        access_m(move |env: &AppEnv| console::println(format!("{}, {}!", env.greeting, name)))
    })
}

#[test]
fn test_echo_against_test_console() {
    let env = TestConsole::with_input(["Toni"]);

    let program = console::println("what's your name?")
        .and_then(console::readln)
        .flat_map(|name| console::println(format!("Hello {}", name)));

    assert_success!(program.provide(&env), Unit);
    assert_eq!(env.output(), vec!["what's your name?", "Hello Toni"]);
}

#[test]
fn test_echo_builtin_matches_hand_written_program() {
    let env = TestConsole::with_input(["Toni"]);
    assert_success!(echo().provide(&env));
    assert_eq!(env.output(), vec!["what's your name?", "Hello Toni"]);
}

#[test]
fn test_composite_environment_projects_console() {
    let env = AppEnv {
        console: TestConsole::with_input(["Ada", "Grace"]),
        greeting: "Welcome".to_string(),
    };

    let program = greet().and_then(greet);
    assert_success!(program.provide(&env));
    assert_eq!(env.console.output(), vec!["Welcome, Ada!", "Welcome, Grace!"]);
}

#[test]
fn test_missing_input_surfaces_as_fault() {
    let env = AppEnv {
        console: TestConsole::new(),
        greeting: "Hi".to_string(),
    };

    assert_failure!(greet().provide(&env));
    assert!(env.console.output().is_empty());
}

#[test]
fn test_missing_input_can_be_recovered() {
    let env = TestConsole::new();

    let program = console::readln()
        .or_else(|| pure("stranger".to_string()))
        .flat_map(|name| console::println(format!("Hello {}", name)));

    assert_success!(program.provide(&env));
    assert_eq!(env.output(), vec!["Hello stranger"]);
}
