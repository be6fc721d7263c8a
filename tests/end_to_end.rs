// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! End-to-end scenarios driving the public `CommandTree` API with an
//! inline (`block_on`) executor, one test per scenario.

use std::sync::Arc;

use futures::executor::block_on;

use commands::command::CommandBuilder;
use commands::component::{ArgumentComponent, CommandFlag, DefaultValue, LiteralComponent};
use commands::context::CommandContext;
use commands::errors::{CommandError, FlagError};
use commands::input::CommandInput;
use commands::parsers::{ChoiceParser, IntegerParser, StringParser};
use commands::tree::CommandTree;

fn ok_handler(_ctx: CommandContext<()>) -> impl std::future::Future<Output = Result<(), commands::errors::CommandExecutionError>> {
    async { Ok(()) }
}

fn parse(tree: &CommandTree<()>, text: &str) -> Result<Arc<commands::command::Command<()>>, CommandError> {
    let mut context = CommandContext::new(Arc::new(()));
    let mut input = CommandInput::tokenize(text).unwrap();
    block_on(tree.parse(&mut context, &mut input))
}

fn parse_with_context(tree: &CommandTree<()>, text: &str) -> (Result<Arc<commands::command::Command<()>>, CommandError>, CommandContext<()>) {
    let mut context = CommandContext::new(Arc::new(()));
    let mut input = CommandInput::tokenize(text).unwrap();
    let result = block_on(tree.parse(&mut context, &mut input));
    (result, context)
}

fn suggest(tree: &CommandTree<()>, text: &str) -> Vec<String> {
    let mut context = CommandContext::new(Arc::new(()));
    let mut input = CommandInput::tokenize(text).unwrap();
    block_on(tree.suggest(&mut context, &mut input))
        .into_iter()
        .map(|s| s.value)
        .collect()
}

/// Scenario 1: `test one`, `test two` (no permission), `test opt
/// [num:int=0]`.
#[test]
fn scenario_one_literal_permission_and_optional_argument() {
    let mut tree = CommandTree::<()>::new();
    tree.register(CommandBuilder::<()>::new("test").literal(LiteralComponent::new("one")).handle(ok_handler))
        .unwrap();
    tree.register(
        CommandBuilder::<()>::new("test")
            .literal(LiteralComponent::new("two"))
            .permission(|_sender| false)
            .handle(ok_handler),
    )
    .unwrap();
    tree.register(
        CommandBuilder::<()>::new("test")
            .literal(LiteralComponent::new("opt"))
            .argument(
                ArgumentComponent::new("num", Arc::new(IntegerParser::new()))
                    .optional(DefaultValue::Parse("0".to_string())),
            )
            .handle(ok_handler),
    )
    .unwrap();

    assert_eq!(parse(&tree, "test one").unwrap().name(), "test");

    assert!(matches!(parse(&tree, "test two"), Err(CommandError::NoPermission)));

    let (result, context) = parse_with_context(&tree, "test opt");
    assert!(result.is_ok());
    assert_eq!(context.get::<i64>("num"), Some(&0));

    let (result, context) = parse_with_context(&tree, "test opt 12");
    assert!(result.is_ok());
    assert_eq!(context.get::<i64>("num"), Some(&12));
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Vegetable {
    Potato,
}

/// Scenario 2: `flags --test(-t) --test2(-f) --num:int --enum:E`.
#[test]
fn scenario_two_flag_group() {
    let mut tree = CommandTree::<()>::new();
    tree.register(
        CommandBuilder::<()>::new("flags")
            .flag(CommandFlag::presence("test").short('t'))
            .flag(CommandFlag::presence("test2").short('f'))
            .flag(CommandFlag::value("num", Arc::new(IntegerParser::new())))
            .flag(CommandFlag::value(
                "enum",
                Arc::new(ChoiceParser::new(vec![("potato", Vegetable::Potato)])),
            ))
            .handle(ok_handler),
    )
    .unwrap();

    let (result, context) = parse_with_context(&tree, "flags");
    assert!(result.is_ok());
    assert!(!context.has_flag("test"));
    assert!(!context.has_flag("test2"));

    let (result, context) = parse_with_context(&tree, "flags -tf --num 63 --enum potato");
    assert!(result.is_ok());
    assert!(context.has_flag("test"));
    assert!(context.has_flag("test2"));
    assert_eq!(context.display("num"), Some("63"));
    assert_eq!(context.display("enum"), Some("potato"));

    let result = parse(&tree, "flags --test --nonexistent");
    assert!(matches!(result, Err(CommandError::Flag(FlagError::Unknown(_)))));
}

/// Scenario 3: `test --flag` declared repeatable with a string value.
#[test]
fn scenario_three_repeatable_value_flag() {
    let mut tree = CommandTree::<()>::new();
    tree.register(
        CommandBuilder::<()>::new("test")
            .flag(CommandFlag::value("flag", Arc::new(StringParser)).repeatable())
            .handle(ok_handler),
    )
    .unwrap();

    let (result, context) = parse_with_context(&tree, "test --flag one --flag two --flag three");
    assert!(result.is_ok());
    assert_eq!(context.flag_values("flag"), &["one".to_string(), "two".to_string(), "three".to_string()]);
}

/// Scenario 4: `test --flag(-f)` as repeatable presence.
#[test]
fn scenario_four_repeatable_presence_flag() {
    let mut tree = CommandTree::<()>::new();
    tree.register(
        CommandBuilder::<()>::new("test")
            .flag(CommandFlag::presence("flag").short('f').repeatable())
            .handle(ok_handler),
    )
    .unwrap();

    let (result, context) = parse_with_context(&tree, "test --flag -fff");
    assert!(result.is_ok());
    assert_eq!(context.flag_count("flag"), 4);
}

/// Scenario 5: `numbers :int` and `numberswithmin :int(5..100)`.
#[test]
fn scenario_five_integer_suggestions() {
    let mut tree = CommandTree::<()>::new();
    tree.register(
        CommandBuilder::<()>::new("numbers")
            .argument(ArgumentComponent::new("n", Arc::new(IntegerParser::new())))
            .handle(ok_handler),
    )
    .unwrap();
    tree.register(
        CommandBuilder::<()>::new("numberswithmin")
            .argument(ArgumentComponent::new("n", Arc::new(IntegerParser::bounded(5, 100))))
            .handle(ok_handler),
    )
    .unwrap();

    assert_eq!(
        suggest(&tree, "numbers "),
        vec!["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"]
    );
    assert_eq!(
        suggest(&tree, "numbers 1"),
        vec!["1", "10", "11", "12", "13", "14", "15", "16", "17", "18", "19"]
    );
    assert_eq!(suggest(&tree, "numberswithmin "), vec!["5", "6", "7", "8", "9"]);
}

/// Scenario 6: a variable branch and a literal branch sharing a prefix.
#[test]
fn scenario_six_literal_wins_over_variable_on_exact_match() {
    let mut tree = CommandTree::<()>::new();
    tree.register(
        CommandBuilder::<()>::new("literalwithvariable")
            .argument(ArgumentComponent::new("value", Arc::new(StringParser)))
            .handle(ok_handler),
    )
    .unwrap();
    tree.register(
        CommandBuilder::<()>::new("literalwithvariable")
            .literal(LiteralComponent::new("literal").alias("literalalias"))
            .handle(ok_handler),
    )
    .unwrap();

    let (result, context) = parse_with_context(&tree, "literalwithvariable argthatdoesnotmatch");
    assert!(result.is_ok());
    assert_eq!(context.display("value"), Some("argthatdoesnotmatch"));

    assert!(parse(&tree, "literalwithvariable literal").is_ok());
    assert!(parse(&tree, "literalwithvariable literalalias").is_ok());
}

/// Invariant: re-registering the exact chain of an existing terminal
/// fails with `DuplicateCommand`.
#[test]
fn reregistering_exact_chain_is_rejected() {
    let mut tree = CommandTree::<()>::new();
    tree.register(CommandBuilder::<()>::new("test").handle(ok_handler)).unwrap();
    let result = tree.register(CommandBuilder::<()>::new("test").handle(ok_handler));
    assert!(matches!(result, Err(commands::errors::RegistrationError::DuplicateCommand(_))));
}

/// Registration order does not affect what a given input resolves to.
#[test]
fn registration_order_does_not_affect_parse_result() {
    let mut forward = CommandTree::<()>::new();
    forward.register(CommandBuilder::<()>::new("a").handle(ok_handler)).unwrap();
    forward.register(CommandBuilder::<()>::new("b").handle(ok_handler)).unwrap();

    let mut backward = CommandTree::<()>::new();
    backward.register(CommandBuilder::<()>::new("b").handle(ok_handler)).unwrap();
    backward.register(CommandBuilder::<()>::new("a").handle(ok_handler)).unwrap();

    assert_eq!(parse(&forward, "a").unwrap().name(), parse(&backward, "a").unwrap().name());
    assert_eq!(parse(&forward, "b").unwrap().name(), parse(&backward, "b").unwrap().name());
}
