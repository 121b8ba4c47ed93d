use matx_text::{FieldValue, ReaderOptions, Section, TextWriter, Value, read_file_with};
use std::env;
use std::process;

const DEFAULT_ROWS: usize = 5;

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = format!("matx_text={}", level);
    if env::var("RUST_LOG").is_err() {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();
    } else {
        env_logger::init();
    }
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    let idx = args.iter().position(|arg| arg == flag)?;
    match args.get(idx + 1) {
        Some(value) => Some(value.as_str()),
        None => {
            eprintln!("ERROR: {} flag requires an argument.", flag);
            process::exit(1);
        }
    }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::Integer(v) => v.to_string(),
        Value::Float(v) => v.to_string(),
        Value::String(s) => format!("{:?}", s),
        Value::Guid(g) => format!("{:?}", g),
    }
}

fn render_field(value: &FieldValue) -> String {
    match value {
        FieldValue::Single(v) => render_value(v),
        FieldValue::Tuple(vs) => {
            let parts: Vec<String> = vs.iter().map(render_value).collect();
            format!("({})", parts.join(", "))
        }
    }
}

fn print_section(section: &Section, max_rows: usize) {
    let declared = section
        .declared_count
        .map(|n| n.to_string())
        .unwrap_or_else(|| "-".to_string());
    println!("\n[{}] declared={} rows={}", section.name, declared, section.rows.len());

    let specs: Vec<String> = section.fields.iter().map(|f| f.spec()).collect();
    println!("  Schema: {}", specs.join(" "));

    for (i, row) in section.rows.iter().take(max_rows).enumerate() {
        let values: Vec<String> = row.iter().map(render_field).collect();
        println!("  {}. {}", i + 1, values.join("  "));
    }
    if section.rows.len() > max_rows {
        println!("  ... and {} more", section.rows.len() - max_rows);
    }
}

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args[1].starts_with("--") {
        eprintln!(
            "Usage: {} <path-to-matx-file> [--encoding <LABEL>] [--rows <N>] [--normalize <OUT>] [--verbose]",
            args[0]
        );
        process::exit(1);
    }

    let path = &args[1];
    let verbose = args.iter().any(|arg| arg == "--verbose");
    init_logging(verbose);

    let mut options = ReaderOptions::default();
    if let Some(label) = flag_value(&args, "--encoding") {
        options = options.with_encoding_label(label);
    }
    let max_rows = match flag_value(&args, "--rows") {
        Some(text) => text.parse::<usize>().unwrap_or_else(|_| {
            eprintln!("ERROR: --rows expects a non-negative integer, got '{}'", text);
            process::exit(1);
        }),
        None => DEFAULT_ROWS,
    };

    println!("Reading MATX file: {}", path);
    println!("{}", "=".repeat(60));

    let document = match read_file_with(path, options) {
        Ok(document) => document,
        Err(e) => {
            eprintln!("\nERROR: Failed to read MATX file");
            eprintln!("  {}", e);
            process::exit(1);
        }
    };

    println!("Sections: {}", document.len());
    if let Some(version) = document.format_version() {
        println!("Format version: {}", version);
    }
    for section in &document {
        print_section(section, max_rows);
    }

    if let Some(out_path) = flag_value(&args, "--normalize") {
        let result = TextWriter::create(out_path).and_then(|mut writer| {
            for section in &document {
                writer.write_section(section)?;
            }
            writer.finish().map(|_| ())
        });
        match result {
            Ok(()) => println!("\nNormalized copy written to {}", out_path),
            Err(e) => {
                eprintln!("\nERROR: Failed to write normalized copy");
                eprintln!("  {}", e);
                process::exit(1);
            }
        }
    }
}
