mod row;

use clap::Parser;
use formula::{Bindings, Engine, EngineOptions, Value, render_error};
use formula_core::parser;
use miette::{IntoDiagnostic, Result};
use reedline::{
    DefaultCompleter, DefaultPrompt, DefaultPromptSegment, DescriptionMode, EditCommand, Emacs,
    ExampleHighlighter, IdeMenu, KeyCode, KeyModifiers, Keybindings, MenuBuilder, Reedline,
    ReedlineEvent, ReedlineMenu, Signal, default_emacs_keybindings,
};
use row::{AttributeArg, MacroArg, ParamArg, build_row, configure_engine};
use serde_json::json;
use std::io::BufRead;
use std::io::BufReader;

/// Formula - evaluate row-wise formulas from the command line
#[derive(Parser, Debug)]
#[command(name = "formula")]
#[command(about = "Evaluate formulas against a single row", long_about = None)]
struct Args {
    /// Row attribute as NAME:KIND=VALUE (repeatable), e.g. age:integer=42
    #[arg(long = "attr", value_name = "NAME:KIND=VALUE")]
    attributes: Vec<AttributeArg>,

    /// Macro as NAME=VALUE (repeatable)
    #[arg(long = "macro", value_name = "NAME=VALUE")]
    macros: Vec<MacroArg>,

    /// Process parameter as OPERATOR.PARAMETER=VALUE (repeatable)
    #[arg(long = "param", value_name = "OPERATOR.PARAMETER=VALUE")]
    params: Vec<ParamArg>,

    /// Seed for rand(), for reproducible output
    #[arg(long)]
    seed: Option<u64>,

    /// Print the parsed syntax tree (for debugging)
    #[arg(long)]
    debug_parse: bool,

    /// Print the resolved expression (for debugging)
    #[arg(long)]
    debug_type: bool,

    /// Print results as JSON objects with kind and value
    #[arg(long)]
    json: bool,

    /// List the built-in functions and exit
    #[arg(long)]
    list_functions: bool,

    /// Formula to evaluate (if not provided, reads from stdin)
    expression: Option<String>,
}

struct Session {
    engine: Engine,
    row: Bindings,
    debug_parse: bool,
    debug_type: bool,
    json: bool,
}

impl Session {
    fn new(args: &Args) -> Self {
        let mut engine = match args.seed {
            Some(seed) => Engine::seeded(seed, EngineOptions::default()),
            None => Engine::default(),
        };
        configure_engine(&mut engine, &args.macros, &args.params);
        Self {
            engine,
            row: build_row(&args.attributes),
            debug_parse: args.debug_parse,
            debug_type: args.debug_type,
            json: args.json,
        }
    }

    /// Names offered by tab completion.
    fn completions(&self) -> Vec<String> {
        let context = self.engine.context(&self.row);
        let mut names: Vec<String> = context
            .list_functions()
            .iter()
            .map(|f| f.name.clone())
            .collect();
        names.extend(context.list_constants());
        names.extend(
            context
                .list_variables()
                .into_iter()
                .map(|(name, _)| format!("[{}]", name)),
        );
        names
    }

    fn interpret(&self, input: &str) {
        if input.trim().is_empty() {
            return;
        }

        if self.debug_parse {
            match parser::parse(input) {
                Ok(parsed) => {
                    println!("=== Parsed Tree ===");
                    println!("{:#?}", parsed.expr);
                    println!();
                }
                Err(e) => {
                    render_error(&e.into());
                    return;
                }
            }
        }

        let formula = match self.engine.compile(input, &self.row) {
            Ok(formula) => formula,
            Err(e) => {
                render_error(&e);
                return;
            }
        };

        if self.debug_type {
            println!("=== Resolved Expression ===");
            println!("{:#?}", formula.typed_expr().expr);
            println!();
        }

        match formula.run(&self.row) {
            Ok(value) if self.json => println!("{}", value_to_json(&value)),
            Ok(value) => println!("{} ({})", value, value.kind()),
            Err(e) => render_error(&e),
        }
    }

    fn list_functions(&self) {
        let context = self.engine.context(&self.row);
        for function in context.list_functions() {
            if self.json {
                println!(
                    "{}",
                    json!({
                        "name": function.name,
                        "category": function.category.to_string(),
                        "synopsis": function.synopsis(),
                        "description": function.description,
                    })
                );
            } else {
                println!(
                    "{:<40} {:<12} {}",
                    function.synopsis(),
                    function.category,
                    function.description
                );
            }
        }
    }
}

fn value_to_json(value: &Value) -> serde_json::Value {
    let payload = match value {
        Value::Integer(v) | Value::Double(v) => {
            // NaN has no JSON form; serde_json turns it into null.
            json!(v)
        }
        Value::Boolean(v) => json!(v),
        Value::String(v) => json!(v),
        Value::Date(v) => json!(v.map(|d| d.to_rfc3339())),
    };
    json!({ "kind": value.kind(), "value": payload })
}

fn add_menu_keybindings(keybindings: &mut Keybindings) {
    keybindings.add_binding(
        KeyModifiers::NONE,
        KeyCode::Tab,
        ReedlineEvent::UntilFound(vec![
            ReedlineEvent::Menu("completion_menu".to_string()),
            ReedlineEvent::MenuNext,
        ]),
    );
    keybindings.add_binding(
        KeyModifiers::ALT,
        KeyCode::Enter,
        ReedlineEvent::Edit(vec![EditCommand::InsertNewline]),
    );
}

fn setup_reedline(words: Vec<String>) -> (Reedline, DefaultPrompt) {
    let completer = Box::new({
        let mut completions = DefaultCompleter::with_inclusions(&['_', '[', ']']);
        completions.insert(words.clone());
        completions
    });

    let ide_menu = IdeMenu::default()
        .with_name("completion_menu")
        .with_min_completion_width(0)
        .with_max_completion_width(50)
        .with_max_completion_height(u16::MAX)
        .with_padding(0)
        .with_cursor_offset(0)
        .with_description_mode(DescriptionMode::PreferRight)
        .with_min_description_width(0)
        .with_max_description_width(50)
        .with_description_offset(1)
        .with_correct_cursor_pos(false);

    let mut keybindings = default_emacs_keybindings();
    add_menu_keybindings(&mut keybindings);

    let line_editor = Reedline::create()
        .with_highlighter(Box::new(ExampleHighlighter::new(words)))
        .with_completer(completer)
        .with_menu(ReedlineMenu::EngineCompleter(Box::new(ide_menu)))
        .with_edit_mode(Box::new(Emacs::new(keybindings)));

    let prompt = DefaultPrompt::new(DefaultPromptSegment::Empty, DefaultPromptSegment::Empty);

    (line_editor, prompt)
}

fn main() -> Result<()> {
    let args = Args::parse();

    use tracing_subscriber::{EnvFilter, fmt};

    // RUST_LOG controls the log level; default to WARN if not set.
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("warn"))
        .into_diagnostic()?;

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let session = Session::new(&args);
    tracing::debug!(
        attributes = args.attributes.len(),
        macros = args.macros.len(),
        params = args.params.len(),
        "Session ready"
    );

    if args.list_functions {
        session.list_functions();
        return Ok(());
    }

    if let Some(expr) = &args.expression {
        session.interpret(expr);
        return Ok(());
    }

    if atty::is(atty::Stream::Stdin) {
        let (mut line_editor, prompt) = setup_reedline(session.completions());

        println!("Formula REPL - Type formulas to evaluate (Ctrl+D or Ctrl+C to exit)");

        loop {
            let sig = match line_editor.read_line(&prompt) {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("Reedline error: {e}");
                    return Ok(());
                }
            };

            match sig {
                Signal::Success(buffer) => session.interpret(&buffer),
                Signal::CtrlD | Signal::CtrlC => {
                    println!("\nGoodbye!");
                    return Ok(());
                }
            }
        }
    } else {
        let stdin = std::io::stdin();
        let reader = BufReader::new(stdin.lock());

        for line in reader.lines() {
            let line = line.into_diagnostic()?;
            session.interpret(&line);
        }
    }

    Ok(())
}
