//! Command-line front end for `xml-accessor`.
//!
//! Every command opens one document, runs a single reader or writer
//! operation and prints the result as plain text or JSON.

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use xml_accessor::{ErrorKind, NamespaceBinding, Reader, ReaderOptions, Writer};

#[derive(Parser, Debug)]
#[command(name = "xml-accessor", version, about = "Query and edit XML documents by XPath")]
pub struct Cli {
    /// XML document to open
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Namespace binding; the first one is the default namespace
    #[arg(long = "namespace", value_name = "URI=PREFIX", global = true)]
    pub namespaces: Vec<String>,

    /// JSON file with reader options
    #[arg(long, value_name = "FILE", global = true)]
    pub options: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub format: OutputFormat,

    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Whether the path matches at least one node
    Has { path: String },
    /// Text of a single leaf node
    String { path: Option<String> },
    /// Integer value of a single leaf node
    Int { path: Option<String> },
    /// Boolean value of a single leaf node
    Bool { path: Option<String> },
    /// Number of nodes the path matches
    Count { path: String },
    /// Every node the path matches
    Collection {
        path: String,
        /// Print the local name of each node instead of its XML
        #[arg(long)]
        name: bool,
    },
    /// Append an element under every node the path matches
    Add {
        path: String,
        name: String,
        #[arg(long = "attr", value_name = "NAME=VALUE")]
        attributes: Vec<String>,
        #[arg(long)]
        value: Option<String>,
    },
    /// Remove every node the path matches
    Remove { path: String },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum Output {
    Flag(bool),
    Number(i64),
    Count(usize),
    Text(String),
    List(Vec<String>),
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    command: &'static str,
    result: &'a Output,
}

#[derive(Serialize)]
struct JsonFailure<'a> {
    command: &'static str,
    error: JsonError<'a>,
}

#[derive(Serialize)]
struct JsonError<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<ErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<u16>,
    message: &'a str,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match execute(&cli) {
        Ok(output) => {
            println!("{}", render(&cli, &output)?);
            Ok(())
        }
        Err(error) => {
            if cli.format == OutputFormat::Json {
                println!("{}", render_error(&cli, &error)?);
            }
            Err(error)
        }
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Run the command of `cli` and return its result
pub fn execute(cli: &Cli) -> Result<Output> {
    let xml = fs::read_to_string(&cli.file)
        .with_context(|| format!("failed to read {}", cli.file.display()))?;
    let options = reader_options(cli)?;
    debug!(file = %cli.file.display(), bindings = options.namespaces.len(), "document read");

    let output = match &cli.command {
        Command::Add {
            path,
            name,
            attributes,
            value,
        } => {
            let attributes = attributes
                .iter()
                .map(|attribute| parse_attribute(attribute))
                .collect::<Result<Vec<_>>>()?;
            let mut writer = Writer::with_options(&xml, &options)?;
            writer.add_node(path, name, &attributes, value.as_deref())?;
            Output::Text(writer.as_xml()?)
        }
        Command::Remove { path } => {
            let mut writer = Writer::with_options(&xml, &options)?;
            writer.remove_node(path)?;
            Output::Text(writer.as_xml()?)
        }
        command => read(&Reader::with_options(&xml, &options)?, command)?,
    };
    Ok(output)
}

fn read(reader: &Reader, command: &Command) -> Result<Output> {
    let output = match command {
        Command::Has { path } => Output::Flag(reader.has_node(path)?),
        Command::String { path } => Output::Text(reader.get_string(path.as_deref())?),
        Command::Int { path } => Output::Number(reader.get_int(path.as_deref())?),
        Command::Bool { path } => Output::Flag(reader.get_bool(path.as_deref())?),
        Command::Count { path } => Output::Count(reader.count(path)?),
        Command::Collection { path, name } => {
            let items = reader
                .get_collection(path)?
                .iter()
                .map(|item| if *name { Ok(item.name()) } else { item.as_xml() })
                .collect::<xml_accessor::Result<Vec<_>>>()?;
            Output::List(items)
        }
        Command::Add { .. } | Command::Remove { .. } => bail!("not a read command"),
    };
    Ok(output)
}

/// Options file first, then `--namespace` flags on top
pub fn reader_options(cli: &Cli) -> Result<ReaderOptions> {
    let mut options = match &cli.options {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("invalid options in {}", path.display()))?
        }
        None => ReaderOptions::default(),
    };

    for (index, binding) in cli.namespaces.iter().enumerate() {
        let binding = parse_binding(binding)?;
        if index == 0 && options.namespace.is_none() {
            options.namespace = Some(binding.uri);
            options.prefix = Some(binding.prefix);
        } else {
            options.namespaces.push(binding);
        }
    }
    Ok(options)
}

/// Parse `URI=PREFIX`; the URI itself may contain `=`
pub fn parse_binding(value: &str) -> Result<NamespaceBinding> {
    match value.rsplit_once('=') {
        Some((uri, prefix)) if !uri.is_empty() && !prefix.is_empty() => {
            Ok(NamespaceBinding::new(uri, prefix))
        }
        _ => bail!("namespace binding must look like URI=PREFIX, got {value:?}"),
    }
}

/// Parse `NAME=VALUE`; the value may contain `=`
pub fn parse_attribute(value: &str) -> Result<(&str, &str)> {
    match value.split_once('=') {
        Some((name, attribute_value)) if !name.is_empty() => Ok((name, attribute_value)),
        _ => bail!("attribute must look like NAME=VALUE, got {value:?}"),
    }
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::Has { .. } => "has",
        Command::String { .. } => "string",
        Command::Int { .. } => "int",
        Command::Bool { .. } => "bool",
        Command::Count { .. } => "count",
        Command::Collection { .. } => "collection",
        Command::Add { .. } => "add",
        Command::Remove { .. } => "remove",
    }
}

/// Format `output` the way `cli` asks for
pub fn render(cli: &Cli, output: &Output) -> Result<String> {
    let rendered = match cli.format {
        OutputFormat::Json => serde_json::to_string_pretty(&JsonOutput {
            command: command_name(&cli.command),
            result: output,
        })?,
        OutputFormat::Text => match output {
            Output::Flag(flag) => flag.to_string(),
            Output::Number(number) => number.to_string(),
            Output::Count(count) => count.to_string(),
            Output::Text(text) => text.clone(),
            Output::List(items) => items.join("\n"),
        },
    };
    Ok(rendered)
}

/// Format a failed command as JSON, with the accessor error kind and code
/// when the failure came from the accessor
pub fn render_error(cli: &Cli, error: &anyhow::Error) -> Result<String> {
    let accessor = error.downcast_ref::<xml_accessor::Error>();
    let message = format!("{error:#}");
    Ok(serde_json::to_string_pretty(&JsonFailure {
        command: command_name(&cli.command),
        error: JsonError {
            kind: accessor.map(xml_accessor::Error::kind),
            code: accessor.map(xml_accessor::Error::code),
            message: &message,
        },
    })?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("urn:book=t", "urn:book", "t")]
    #[case("http://example.org/?a=1=q", "http://example.org/?a=1", "q")]
    fn bindings(#[case] value: &str, #[case] uri: &str, #[case] prefix: &str) {
        assert_eq!(parse_binding(value).unwrap(), NamespaceBinding::new(uri, prefix));
    }

    #[rstest]
    #[case("urn:book")]
    #[case("=t")]
    #[case("urn:book=")]
    fn malformed_bindings(#[case] value: &str) {
        assert!(parse_binding(value).is_err());
    }

    #[test]
    fn attributes() {
        assert_eq!(parse_attribute("lang=en").unwrap(), ("lang", "en"));
        assert_eq!(parse_attribute("expr=a=b").unwrap(), ("expr", "a=b"));
        assert_eq!(parse_attribute("empty=").unwrap(), ("empty", ""));
        assert!(parse_attribute("=x").is_err());
        assert!(parse_attribute("novalue").is_err());
    }

    #[test]
    fn parses_commands_and_global_flags() {
        let cli = Cli::try_parse_from([
            "xml-accessor",
            "books.xml",
            "add",
            "/t:bookstore",
            "book",
            "--attr",
            "category=poetry",
            "--namespace",
            "urn:book=t",
            "--format",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.namespaces, ["urn:book=t"]);
        assert_eq!(
            cli.command,
            Command::Add {
                path: "/t:bookstore".into(),
                name: "book".into(),
                attributes: vec!["category=poetry".into()],
                value: None,
            }
        );
    }

    #[test]
    fn first_binding_is_the_default() {
        let cli = Cli::try_parse_from([
            "xml-accessor",
            "books.xml",
            "--namespace",
            "urn:book=t",
            "--namespace",
            "urn:id=n",
            "count",
            "t:book",
        ])
        .unwrap();

        let options = reader_options(&cli).unwrap();
        assert_eq!(options.namespace.as_deref(), Some("urn:book"));
        assert_eq!(options.prefix.as_deref(), Some("t"));
        assert_eq!(options.namespaces, vec![NamespaceBinding::new("urn:id", "n")]);
    }

    #[test]
    fn string_path_is_optional() {
        let cli = Cli::try_parse_from(["xml-accessor", "books.xml", "string"]).unwrap();
        assert_eq!(cli.command, Command::String { path: None });
    }

    #[test]
    fn json_output_names_the_command() {
        let cli = Cli::try_parse_from(["xml-accessor", "a.xml", "--format", "json", "count", "b"])
            .unwrap();
        let rendered = render(&cli, &Output::Count(3)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value["command"], "count");
        assert_eq!(value["result"], 3);
    }

    #[test]
    fn json_errors_carry_kind_and_code() {
        let cli = Cli::try_parse_from(["xml-accessor", "a.xml", "--format", "json", "string", "b"])
            .unwrap();
        let error = anyhow::Error::new(xml_accessor::Error::AmbiguousPath {
            path: "b".into(),
            count: 2,
        });
        let value: serde_json::Value =
            serde_json::from_str(&render_error(&cli, &error).unwrap()).unwrap();
        assert_eq!(value["command"], "string");
        assert_eq!(value["error"]["kind"], "AMBIGUOUS_PATH");
        assert_eq!(value["error"]["code"], 3);
        assert!(value["error"]["message"].as_str().unwrap().contains("ambiguous"));

        let other = anyhow::anyhow!("failed to read a.xml");
        let value: serde_json::Value =
            serde_json::from_str(&render_error(&cli, &other).unwrap()).unwrap();
        assert!(value["error"].get("kind").is_none());
        assert_eq!(value["error"]["message"], "failed to read a.xml");
    }

    #[test]
    fn text_output_joins_lists() {
        let cli = Cli::try_parse_from(["xml-accessor", "a.xml", "collection", "b"]).unwrap();
        let rendered = render(&cli, &Output::List(vec!["x".into(), "y".into()])).unwrap();
        assert_eq!(rendered, "x\ny");
    }
}
