//! Tests for App resolution: parse, parse_known, run, run_known

use argtree::{App, Error, Node, Values};
use clap::error::ErrorKind;
use clap::{value_parser, Arg, ArgAction};
use rstest::rstest;

use argtree::util::testing;

fn parse_error_kind(err: Error) -> ErrorKind {
    match err {
        Error::Parse(e) => e.kind(),
        other => panic!("expected parser error, got {other:?}"),
    }
}

#[test]
fn given_root_flag_and_typed_positional_when_running_then_handler_sees_both() {
    testing::init_test_setup();
    // Arrange
    let mut app = App::new("prog");
    app.arg(
        Arg::new("foo")
            .long("foo")
            .action(ArgAction::SetTrue)
            .help("foo help"),
    );
    app.command("a", |a| {
        a.configure(|p| p.about("a help"))
            .arg(
                Arg::new("bar")
                    .required(true)
                    .value_parser(value_parser!(i64))
                    .help("bar help"),
            )
            .handler(|v| (v.get_flag("foo"), *v.get_one::<i64>("bar").unwrap()))?;
        Ok(())
    })
    .unwrap();

    // Act
    let result = app.run(["a", "12"]).unwrap();

    // Assert
    assert_eq!(result, (false, 12));
    assert_eq!(app.run(["--foo", "a", "7"]).unwrap(), (true, 7));
}

#[test]
fn given_missing_required_argument_when_running_then_parser_error_passes_through() {
    let mut app = App::new("prog");
    app.command("a", |a| {
        a.arg(Arg::new("bar").required(true).value_parser(value_parser!(i64)))
            .handler(|_| ())?;
        Ok(())
    })
    .unwrap();

    assert_eq!(
        parse_error_kind(app.run(["a"]).unwrap_err()),
        ErrorKind::MissingRequiredArgument
    );
    assert_eq!(
        parse_error_kind(app.run(["a", "twelve"]).unwrap_err()),
        ErrorKind::ValueValidation
    );
}

#[test]
fn given_unknown_command_when_running_then_parser_error() {
    let mut app = App::new("prog");
    app.command("a", |a| {
        a.handler(|_| ())?;
        Ok(())
    })
    .unwrap();

    assert_eq!(
        parse_error_kind(app.run(["nope"]).unwrap_err()),
        ErrorKind::InvalidSubcommand
    );
}

#[test]
fn given_group_without_subcommand_token_when_running_then_parser_error() {
    let mut app = App::new("prog");
    app.group("g", |g| {
        g.command("a", |a| {
            a.handler(|_| ())?;
            Ok(())
        })?;
        Ok(())
    })
    .unwrap();

    assert!(matches!(app.run(["g"]), Err(Error::Parse(_))));
}

#[rstest]
#[case("a a", (None, false))]
#[case("a -x foo a", (Some("foo".to_string()), false))]
#[case("a -x a a", (Some("a".to_string()), false))]
#[case("a a -y", (None, true))]
#[case("a -x foo a -y", (Some("foo".to_string()), true))]
fn given_args_on_group_and_leaf_when_running_then_both_levels_visible(
    #[case] line: &str,
    #[case] expected: (Option<String>, bool),
) {
    let mut app = App::new("prog");
    app.group("a", |a| {
        a.arg(Arg::new("x").short('x'));
        a.command("a", |aa| {
            aa.arg(Arg::new("y").short('y').action(ArgAction::SetTrue))
                .handler(|v| (v.get_one::<String>("x").cloned(), v.get_flag("y")))?;
            Ok(())
        })?;
        Ok(())
    })
    .unwrap();

    assert_eq!(app.run(line.split_whitespace()).unwrap(), expected);
}

#[test]
fn given_bound_handler_when_parsing_then_returns_that_handler() {
    let mut app = App::new("prog");
    app.command("a", |a| {
        a.handler(|v: &Values| v.path().join("/"))?;
        Ok(())
    })
    .unwrap();

    let (handler, values) = app.parse(["a"]).unwrap();

    assert_eq!(values.path(), ["a".to_string()]);
    assert_eq!(handler.call(&values, &[]), "a");
    let (again, _) = app.parse(["a"]).unwrap();
    assert!(again.ptr_eq(&handler));
}

#[test]
fn given_trailing_tokens_when_parsing_strictly_then_unknown_argument() {
    let mut app = App::new("prog");
    app.command("a", |a| {
        a.handler(|_| ())?;
        Ok(())
    })
    .unwrap();

    assert_eq!(
        parse_error_kind(app.parse(["a", "b"]).unwrap_err()),
        ErrorKind::UnknownArgument
    );
}

#[test]
fn given_trailing_tokens_when_parsing_known_then_returns_leftovers() {
    let mut app = App::new("prog");
    app.command("a", |a| {
        a.handler(|_| ())?;
        Ok(())
    })
    .unwrap();

    let (_, values, leftovers) = app.parse_known(["a", "b"]).unwrap();

    assert_eq!(leftovers, vec!["b".to_string()]);
    assert_eq!(values.path(), ["a".to_string()]);
}

#[test]
fn given_declared_args_and_trailing_tokens_when_parsing_known_then_values_unaffected() {
    let mut app = App::new("prog");
    app.command("a", |a| {
        a.arg(Arg::new("y").short('y').action(ArgAction::SetTrue))
            .arg(Arg::new("name"))
            .handler(|_| ())?;
        Ok(())
    })
    .unwrap();

    let (_, values, leftovers) = app
        .parse_known(["a", "-y", "first", "b", "c", "d"])
        .unwrap();

    assert!(values.get_flag("y"));
    assert_eq!(values.get_one::<String>("name").map(String::as_str), Some("first"));
    assert_eq!(leftovers, vec!["b", "c", "d"]);
}

#[test]
fn given_declared_option_after_unknown_token_when_parsing_known_then_option_parsed() {
    let mut app = App::new("prog");
    app.command("a", |a| {
        a.arg(Arg::new("bar").required(true).value_parser(value_parser!(i64)))
            .arg(Arg::new("opt").long("opt"))
            .handler(|_| ())?;
        Ok(())
    })
    .unwrap();

    let (_, values, leftovers) = app.parse_known(["a", "12", "extra", "--opt", "v"]).unwrap();

    assert_eq!(values.get_one::<i64>("bar"), Some(&12));
    assert_eq!(values.get_one::<String>("opt").map(String::as_str), Some("v"));
    assert_eq!(leftovers, vec!["extra"]);
}

#[test]
fn given_unknown_token_spelled_like_command_when_parsing_known_then_only_it_is_set_aside() {
    let mut app = App::new("prog");
    app.command("a", |a| {
        a.handler(|v: &Values| v.path().join("/"))?;
        Ok(())
    })
    .unwrap();

    let (handler, values, leftovers) = app.parse_known(["a", "a"]).unwrap();

    assert_eq!(handler.call(&values, &leftovers), "a");
    assert_eq!(leftovers, vec!["a"]);
}

fn positional(shape: &str) -> Arg {
    let arg = Arg::new("n").value_parser(value_parser!(i64));
    match shape {
        "pair" => arg.num_args(2).required(true),
        "append" => arg.action(ArgAction::Append),
        "open" => arg.num_args(1..),
        _ => arg,
    }
}

fn app_with_leaf(shape: &str) -> App<(Vec<i64>, Option<String>)> {
    let mut app = App::new("prog");
    app.command("a", |a| {
        a.arg(positional(shape))
            .arg(Arg::new("opt").long("opt"))
            .handler(|v: &Values| {
                let ns = v
                    .get_many::<i64>("n")
                    .map(|ns| ns.copied().collect())
                    .unwrap_or_default();
                (ns, v.get_one::<String>("opt").cloned())
            })?;
        Ok(())
    })
    .unwrap();
    app
}

#[rstest]
#[case("pair")]
#[case("append")]
#[case("open")]
fn given_multi_value_positional_when_running_then_collects_values(#[case] shape: &str) {
    testing::init_test_setup();
    let app = app_with_leaf(shape);

    app.parser().debug_assert();
    assert_eq!(app.run(["a", "1", "2"]).unwrap(), (vec![1, 2], None));
    assert_eq!(app.run_known(["a", "1", "2"]).unwrap(), (vec![1, 2], None));
}

#[rstest]
#[case("single", "a 1 extra --opt v", vec![1], Some("v"), vec!["extra"])]
#[case("single", "--bogus a 1", vec![1], None, vec!["--bogus"])]
#[case("pair", "a 1 2 --bogus", vec![1, 2], None, vec!["--bogus"])]
#[case("pair", "a --bogus 1 2 --opt v", vec![1, 2], Some("v"), vec!["--bogus"])]
#[case("append", "a 1 --bogus 2", vec![1, 2], None, vec!["--bogus"])]
#[case("open", "a 1 2 --bogus", vec![1, 2], None, vec!["--bogus"])]
#[case("open", "a 1 --bogus=3 2 --opt v", vec![1, 2], Some("v"), vec!["--bogus=3"])]
#[case("open", "a 1 --x 2 --y", vec![1, 2], None, vec!["--x", "--y"])]
fn given_leaf_shape_and_unknown_tokens_when_parsing_then_strict_fails_and_known_sets_aside(
    #[case] shape: &str,
    #[case] line: &str,
    #[case] ns: Vec<i64>,
    #[case] opt: Option<&str>,
    #[case] expected_leftovers: Vec<&str>,
) {
    testing::init_test_setup();
    let app = app_with_leaf(shape);
    let tokens: Vec<&str> = line.split_whitespace().collect();

    assert_eq!(
        parse_error_kind(app.parse(tokens.clone()).unwrap_err()),
        ErrorKind::UnknownArgument
    );

    let (handler, values, leftovers) = app.parse_known(tokens).unwrap();
    assert_eq!(leftovers, expected_leftovers);
    assert_eq!(handler.call(&values, &leftovers), (ns, opt.map(String::from)));
}

#[test]
fn given_other_parser_error_when_parsing_known_then_passes_through() {
    let app = app_with_leaf("pair");

    assert_eq!(
        parse_error_kind(app.parse_known(["a", "1", "--bogus"]).unwrap_err()),
        ErrorKind::WrongNumberOfValues
    );
}

#[test]
fn given_known_handler_when_running_known_then_receives_leftovers() {
    let mut app = App::new("prog");
    app.command("a", |a| {
        a.handler_known(|_, leftovers| leftovers.to_vec())?;
        Ok(())
    })
    .unwrap();

    assert_eq!(app.run_known(["a", "b"]).unwrap(), vec!["b".to_string()]);
    assert!(app.run_known(["a"]).unwrap().is_empty());
    assert!(app.run(["a"]).unwrap().is_empty());
}

#[test]
fn given_plain_handler_when_running_known_then_leftovers_ignored() {
    let mut app = App::new("prog");
    app.command("a", |a| {
        a.handler(|v| v.path().len())?;
        Ok(())
    })
    .unwrap();

    assert_eq!(app.run_known(["a", "x", "y"]).unwrap(), 1);
}

#[test]
fn given_open_ended_positional_when_running_then_values_collected() {
    let mut app = App::new("prog");
    app.command("sum", |s| {
        s.arg(
            Arg::new("numbers")
                .num_args(1..)
                .required(true)
                .value_parser(value_parser!(i64)),
        )
        .handler(|v| v.get_many::<i64>("numbers").unwrap().sum::<i64>())?;
        Ok(())
    })
    .unwrap();

    assert_eq!(app.run(["sum", "1", "2", "3"]).unwrap(), 6);
}

#[test]
fn given_populated_app_when_validating_then_ok() {
    let mut app = App::new("prog");
    app.command("a", |a| {
        a.handler(|_| ())?;
        Ok(())
    })
    .unwrap();

    assert!(app.validate().is_ok());
    app.parser().debug_assert();
}
