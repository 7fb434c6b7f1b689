//! Command-line interface for the umlgen utility
//!
//! Reads a JSON type manifest and writes a PlantUML class diagram.

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use tracing::debug;

use umlgen::core::logging::init_logging;
use umlgen::{
    ClassDiagramBuilder, DiagramOptions, Introspector, Manifest, PackageStyle, TypeKind,
    TypeOrder, TypeRegistry,
};

/// umlgen - Generate PlantUML class diagrams from type manifests
#[derive(Parser)]
#[command(name = "umlgen")]
#[command(about = "A Rust utility to generate PlantUML class diagrams from type manifests")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Set log level (trace|debug|info|warn|error)
    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,

    /// Set log format (compact|pretty|json)
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Log level options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Log format options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render a class diagram from a type manifest
    Render {
        /// Manifest file describing the types (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file for the diagram (use - for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// JSON file with diagram options; flags below are applied on top
        #[arg(short, long)]
        config: Option<PathBuf>,

        #[command(flatten)]
        flags: OptionFlags,
    },

    /// List the types described by a manifest
    Types {
        /// Manifest file describing the types (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Show in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Check that a manifest and options build a diagram
    Validate {
        /// Manifest file describing the types (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// JSON file with diagram options
        #[arg(short, long)]
        config: Option<PathBuf>,

        #[command(flatten)]
        flags: OptionFlags,
    },
}

/// Package block styles
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum StyleChoice {
    Node,
    Rectangle,
    Folder,
    Frame,
    Cloud,
    Database,
}

impl From<StyleChoice> for PackageStyle {
    fn from(value: StyleChoice) -> Self {
        match value {
            StyleChoice::Node => PackageStyle::Node,
            StyleChoice::Rectangle => PackageStyle::Rectangle,
            StyleChoice::Folder => PackageStyle::Folder,
            StyleChoice::Frame => PackageStyle::Frame,
            StyleChoice::Cloud => PackageStyle::Cloud,
            StyleChoice::Database => PackageStyle::Database,
        }
    }
}

/// Type block ordering
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum OrderChoice {
    /// Sort by display name
    Name,
    /// Keep the order types were requested and discovered in
    Declaration,
}

impl From<OrderChoice> for TypeOrder {
    fn from(value: OrderChoice) -> Self {
        match value {
            OrderChoice::Name => TypeOrder::Name,
            OrderChoice::Declaration => TypeOrder::Declaration,
        }
    }
}

/// Diagram options settable from the command line
#[derive(Args, Debug, Default, Clone, PartialEq, Eq)]
pub struct OptionFlags {
    /// Qualified name of a type to draw (repeatable)
    #[arg(short = 't', long = "type", value_name = "QUALIFIED_NAME")]
    pub types: Vec<String>,

    /// Package whose types are all drawn (repeatable)
    #[arg(short, long = "package", value_name = "PACKAGE")]
    pub packages: Vec<String>,

    /// Exclude members whose `Type.member` fully matches the pattern (repeatable)
    #[arg(short, long = "exclude", value_name = "REGEX")]
    pub excludes: Vec<String>,

    /// Also draw every resolvable type the drawn types refer to
    #[arg(long)]
    pub with_dependencies: bool,

    /// Draw associations from a type to itself
    #[arg(long)]
    pub show_self_links: bool,

    /// Text written after the start marker
    #[arg(long)]
    pub header: Option<String>,

    /// Text written before the end marker
    #[arg(long)]
    pub footer: Option<String>,

    /// Diagram title
    #[arg(long)]
    pub title: Option<String>,

    /// Style of package blocks
    #[arg(long, value_enum)]
    pub package_style: Option<StyleChoice>,

    /// Order of type blocks
    #[arg(long, value_enum)]
    pub order: Option<OrderChoice>,
}

impl OptionFlags {
    /// Overlay the flags on options loaded from a file
    pub fn apply(self, options: &mut DiagramOptions) {
        options.types.extend(self.types);
        options.packages.extend(self.packages);
        options.excludes.extend(self.excludes);
        if self.with_dependencies {
            options.expand_dependencies = true;
        }
        if self.show_self_links {
            options.hide_self_links = false;
        }
        if self.header.is_some() {
            options.header = self.header;
        }
        if self.footer.is_some() {
            options.footer = self.footer;
        }
        if self.title.is_some() {
            options.title = self.title;
        }
        if let Some(style) = self.package_style {
            options.package_style = style.into();
        }
        if let Some(order) = self.order {
            options.type_order = order.into();
        }
    }
}

/// One row of the `types` listing
#[derive(Debug, Serialize)]
pub struct TypeSummary {
    pub name: String,
    pub kind: TypeKind,
    pub package: Option<String>,
    pub fields: usize,
    pub methods: usize,
}

#[derive(Debug, Serialize)]
struct TypeListing {
    types: Vec<TypeSummary>,
    total: usize,
}

/// Main CLI application
#[derive(Debug, Default)]
pub struct UmlgenApp;

impl UmlgenApp {
    /// Create a new application instance
    pub fn new() -> Self {
        Self
    }

    /// Run the application with the given CLI arguments
    pub fn run(&self, cli: Cli) -> Result<()> {
        // environment variables take precedence over flags
        let log_level_str = std::env::var("UMLGEN_LOG_LEVEL")
            .ok()
            .or_else(|| std::env::var("RUST_LOG").ok())
            .unwrap_or_else(|| cli.log_level.as_str().to_string());

        let log_format_str = std::env::var("UMLGEN_LOG_FORMAT")
            .ok()
            .unwrap_or_else(|| cli.log_format.as_str().to_string());

        if let Err(e) = init_logging(Some(&log_level_str), Some(&log_format_str)) {
            eprintln!("Warning: Failed to initialize logging: {}", e);
        }

        if cli.verbose {
            eprintln!("umlgen v{}", env!("CARGO_PKG_VERSION"));
        }

        match cli.command {
            Commands::Render {
                input,
                output,
                config,
                flags,
            } => self.render_command(input, output, config, flags, cli.verbose),
            Commands::Types { input, json } => self.types_command(input, json, cli.verbose),
            Commands::Validate {
                input,
                config,
                flags,
            } => self.validate_command(input, config, flags, cli.verbose),
        }
    }

    /// Handle the render command
    fn render_command(
        &self,
        input: Option<PathBuf>,
        output: Option<PathBuf>,
        config: Option<PathBuf>,
        flags: OptionFlags,
        verbose: bool,
    ) -> Result<()> {
        let registry = self.load_registry(input, verbose)?;
        let options = self.load_options(config, flags)?;

        let diagram = ClassDiagramBuilder::with_options(&registry, options)?.build()?;

        if verbose {
            eprintln!("Rendered diagram ({} bytes)", diagram.len());
        }

        self.write_output(output, &diagram)
    }

    /// Handle the types command
    fn types_command(&self, input: Option<PathBuf>, json: bool, verbose: bool) -> Result<()> {
        let registry = self.load_registry(input, verbose)?;
        println!("{}", self.describe_types(&registry, json)?);
        Ok(())
    }

    /// Listing of the registered types, plain or JSON
    pub fn describe_types(&self, registry: &TypeRegistry, json: bool) -> Result<String> {
        let summaries: Vec<TypeSummary> = registry
            .handles()
            .filter_map(|handle| registry.describe(handle))
            .map(|d| TypeSummary {
                name: d.qualified_name().to_string(),
                kind: d.kind(),
                package: d.package().map(str::to_string),
                fields: d.fields().len(),
                methods: d.methods().len(),
            })
            .collect();

        if json {
            let listing = TypeListing {
                total: summaries.len(),
                types: summaries,
            };
            return Ok(serde_json::to_string_pretty(&listing)?);
        }

        let mut lines = vec!["Described types:".to_string()];
        lines.extend(
            summaries
                .iter()
                .map(|s| format!("  {:<16} {}", s.kind.to_string(), s.name)),
        );
        lines.push(String::new());
        lines.push(format!("Total: {} types", summaries.len()));
        Ok(lines.join("\n"))
    }

    /// Handle the validate command
    fn validate_command(
        &self,
        input: Option<PathBuf>,
        config: Option<PathBuf>,
        flags: OptionFlags,
        verbose: bool,
    ) -> Result<()> {
        let registry = self.load_registry(input, verbose)?;
        let options = self.load_options(config, flags)?;

        let model = ClassDiagramBuilder::with_options(&registry, options)
            .and_then(|builder| builder.build_model());
        match model {
            Ok(model) => {
                println!(
                    "✓ Valid class diagram: {} types, {} associations",
                    model.types().len(),
                    model.associations().len()
                );
                Ok(())
            }
            Err(e) => {
                println!("✗ Invalid class diagram: {}", e);
                Err(e.into())
            }
        }
    }

    fn load_registry(&self, input: Option<PathBuf>, verbose: bool) -> Result<TypeRegistry> {
        let content = self.read_input(input)?;
        if verbose {
            eprintln!("Read {} bytes of input", content.len());
        }
        let registry = Manifest::from_json_str(&content)?.into_registry()?;
        debug!(type_count = registry.len(), "Loaded manifest");
        Ok(registry)
    }

    /// Options from the config file, if any, with the flags applied on top
    pub fn load_options(&self, config: Option<PathBuf>, flags: OptionFlags) -> Result<DiagramOptions> {
        let mut options = match config {
            Some(path) => DiagramOptions::from_path(&path)
                .with_context(|| format!("Failed to load config file '{}'", path.display()))?,
            None => DiagramOptions::default(),
        };
        flags.apply(&mut options);
        options.validate()?;
        Ok(options)
    }

    /// Read input from file or stdin
    pub fn read_input(&self, input: Option<PathBuf>) -> Result<String> {
        match input {
            Some(path) if path.to_string_lossy() != "-" => fs::read_to_string(&path)
                .map_err(|e| anyhow!("Failed to read input file '{}': {}", path.display(), e)),
            _ => {
                let mut content = String::new();
                io::stdin().read_to_string(&mut content)?;
                Ok(content)
            }
        }
    }

    /// Write output to file or stdout
    ///
    /// Files receive the diagram byte for byte; stdout gets a final newline.
    pub fn write_output(&self, output: Option<PathBuf>, content: &str) -> Result<()> {
        match output {
            Some(path) if path.to_string_lossy() != "-" => {
                fs::write(&path, content).map_err(|e| {
                    anyhow!("Failed to write output file '{}': {}", path.display(), e)
                })?;
            }
            _ => {
                let mut stdout = io::stdout().lock();
                stdout.write_all(content.as_bytes())?;
                if !content.is_empty() && !content.ends_with('\n') {
                    stdout.write_all(b"\n")?;
                }
                stdout.flush()?;
            }
        }
        Ok(())
    }
}
