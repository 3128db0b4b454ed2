use std::{fmt::Display, str::FromStr};

use anyhow::Context;
use clap::{Parser, Subcommand};
use fsm_transform_lib::{
    config::ToolConfig,
    logger::{LogLevel, Logger},
    machine::{
        Machine,
        conversion::{mealy_to_moore, moore_to_mealy},
        mealy::MealyMachine,
        minimization::Minimizable,
        moore::MooreMachine,
        nfa::Nfa,
    },
    validation::same_behavior::{
        equivalent_mealy_moore, same_behavior_mealy, same_behavior_moore, same_language,
    },
};
use serde::Serialize;

/// The machine kind an input table describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Mealy,
    Moore,
}

impl FromStr for Kind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mealy" => Ok(Kind::Mealy),
            "moore" => Ok(Kind::Moore),
            _ => Err(format!("Invalid machine kind: {}", s)),
        }
    }
}

impl Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Kind::Mealy => write!(f, "mealy"),
            Kind::Moore => write!(f, "moore"),
        }
    }
}

/// The direction of a Mealy/Moore conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    MealyToMoore,
    MooreToMealy,
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mealy-to-moore" => Ok(Direction::MealyToMoore),
            "moore-to-mealy" => Ok(Direction::MooreToMealy),
            _ => Err(format!("Invalid conversion direction: {}", s)),
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::MealyToMoore => write!(f, "mealy-to-moore"),
            Direction::MooreToMealy => write!(f, "moore-to-mealy"),
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "FSM Transform")]
#[command(version = "0.1")]
#[command(about = "Determinize, minimize and convert finite state machines", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<String>,

    /// Overrides the configured log level and enables logging.
    #[arg(long)]
    log_level: Option<LogLevel>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Turn a nondeterministic table into a deterministic one.
    Determinize {
        input: String,
        output: String,

        /// Also render the result as a DOT graph to this path.
        #[arg(long)]
        dot: Option<String>,
    },
    /// Minimize a machine of the given kind.
    Minimize {
        kind: Kind,
        input: String,
        output: String,

        /// Also render the result as a DOT graph to this path.
        #[arg(long)]
        dot: Option<String>,
    },
    /// Convert between the Mealy and Moore conventions.
    Convert {
        direction: Direction,
        input: String,
        output: String,

        /// Also render the result as a DOT graph to this path.
        #[arg(long)]
        dot: Option<String>,
    },
}

#[derive(Debug, Serialize)]
struct TransformSummary {
    operation: String,
    states_before: usize,
    states_after: usize,
    validated: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = ToolConfig::from_optional_file(args.config.as_deref())?;
    if let Some(level) = args.log_level {
        config.logger.enabled = true;
        config.logger.log_level = level;
    }
    let logger = Logger::from_config(&config.logger, "Transform".into());

    let summary = match &args.command {
        Command::Determinize { input, output, dot } => {
            determinize(input, output, dot.as_deref(), &config, logger.as_ref())?
        }
        Command::Minimize {
            kind,
            input,
            output,
            dot,
        } => minimize(*kind, input, output, dot.as_deref(), &config, logger.as_ref())?,
        Command::Convert {
            direction,
            input,
            output,
            dot,
        } => convert(
            *direction,
            input,
            output,
            dot.as_deref(),
            &config,
            logger.as_ref(),
        )?,
    };

    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}

fn determinize(
    input: &str,
    output: &str,
    dot: Option<&str>,
    config: &ToolConfig,
    logger: Option<&Logger>,
) -> anyhow::Result<TransformSummary> {
    let nfa = Nfa::from_file(input).with_context(|| format!("reading {}", input))?;
    if let Some(l) = logger {
        l.info(&format!("loaded {} states from {}", nfa.state_count(), input));
    }

    let result = nfa.determinize();

    let validated = config.validation.enabled;
    if validated && !same_language(&nfa, &result, config.validation.max_word_length) {
        anyhow::bail!("determinization changed the accepted language");
    }

    if let Some(l) = logger {
        l.info(&format!("determinized to {} states", result.state_count()));
    }

    write_result(&Machine::Moore(result.clone()), output, dot)?;

    Ok(TransformSummary {
        operation: "determinize".into(),
        states_before: nfa.state_count(),
        states_after: result.state_count(),
        validated,
    })
}

fn minimize(
    kind: Kind,
    input: &str,
    output: &str,
    dot: Option<&str>,
    config: &ToolConfig,
    logger: Option<&Logger>,
) -> anyhow::Result<TransformSummary> {
    let validated = config.validation.enabled;
    let max_len = config.validation.max_word_length;

    let (states_before, result) = match kind {
        Kind::Mealy => {
            let machine =
                MealyMachine::from_file(input).with_context(|| format!("reading {}", input))?;
            let minimized = machine.minimize()?;
            if validated && !same_behavior_mealy(&machine, &minimized, max_len) {
                anyhow::bail!("minimization changed the machine's behavior");
            }
            (machine.state_count(), Machine::Mealy(minimized))
        }
        Kind::Moore => {
            let machine =
                MooreMachine::from_file(input).with_context(|| format!("reading {}", input))?;
            let minimized = machine.minimize()?;
            if validated && !same_behavior_moore(&machine, &minimized, max_len) {
                anyhow::bail!("minimization changed the machine's behavior");
            }
            (machine.state_count(), Machine::Moore(minimized))
        }
    };

    if let Some(l) = logger {
        l.info(&format!(
            "minimized {} states down to {}",
            states_before,
            result.state_count()
        ));
    }

    write_result(&result, output, dot)?;

    Ok(TransformSummary {
        operation: format!("minimize-{}", kind),
        states_before,
        states_after: result.state_count(),
        validated,
    })
}

fn convert(
    direction: Direction,
    input: &str,
    output: &str,
    dot: Option<&str>,
    config: &ToolConfig,
    logger: Option<&Logger>,
) -> anyhow::Result<TransformSummary> {
    let validated = config.validation.enabled;
    let max_len = config.validation.max_word_length;

    let (states_before, result) = match direction {
        Direction::MealyToMoore => {
            let machine =
                MealyMachine::from_file(input).with_context(|| format!("reading {}", input))?;
            let converted = mealy_to_moore(&machine);
            if validated && !equivalent_mealy_moore(&machine, &converted, max_len) {
                anyhow::bail!("conversion changed the machine's behavior");
            }
            (machine.state_count(), Machine::Moore(converted))
        }
        Direction::MooreToMealy => {
            let machine =
                MooreMachine::from_file(input).with_context(|| format!("reading {}", input))?;
            let converted = moore_to_mealy(&machine);
            if validated && !equivalent_mealy_moore(&converted, &machine, max_len) {
                anyhow::bail!("conversion changed the machine's behavior");
            }
            (machine.state_count(), Machine::Mealy(converted))
        }
    };

    if let Some(l) = logger {
        l.info(&format!(
            "converted {} ({} states to {})",
            direction,
            states_before,
            result.state_count()
        ));
    }

    write_result(&result, output, dot)?;

    Ok(TransformSummary {
        operation: format!("convert-{}", direction),
        states_before,
        states_after: result.state_count(),
        validated,
    })
}

fn write_result(machine: &Machine, output: &str, dot: Option<&str>) -> anyhow::Result<()> {
    std::fs::write(output, machine.to_table()).with_context(|| format!("writing {}", output))?;

    if let Some(dot) = dot {
        std::fs::write(dot, machine.to_graphviz()).with_context(|| format!("writing {}", dot))?;
    }

    Ok(())
}
