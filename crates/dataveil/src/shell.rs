//! The interactive operator loop: collects the dataset configuration,
//! then drives the dataset store and the masking engine from a 9-option
//! menu. Every store/engine error is printed and the loop continues —
//! nothing here terminates the process.
//!
//! I/O goes through `BufRead`/`Write` parameters so sessions can be
//! scripted in tests.

use dataveil_core::{CoreError, Entry, EntryId, FieldName, FieldPolicy, MaskCategory, PolicyMap};
use dataveil_engine::{FakeProvider, MaskingEngine};
use dataveil_store::{entry_dump, masked_dump, original_dump, save_to_file, Dataset, StoreError};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ShellError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Config(#[from] CoreError),
}

pub type ShellResult<T> = Result<T, ShellError>;

pub struct ShellOptions {
    /// Directory where export files are written.
    pub output_dir: PathBuf,
}

impl Default for ShellOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
        }
    }
}

/// Print `prompt`, read one line. `None` means end of input.
fn read_trimmed<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
) -> ShellResult<Option<String>> {
    write!(output, "{}", prompt)?;
    output.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn display_menu<W: Write>(output: &mut W) -> ShellResult<()> {
    writeln!(output)?;
    writeln!(output, "Options:")?;
    writeln!(output, "1 - Add an entry")?;
    writeln!(output, "2 - Delete an entry")?;
    writeln!(output, "3 - View entries")?;
    writeln!(output, "4 - Modify a field of an entry")?;
    writeln!(output, "5 - Mask an entry")?;
    writeln!(output, "6 - Mask all entries")?;
    writeln!(output, "7 - Export original data")?;
    writeln!(output, "8 - Export masked data")?;
    writeln!(output, "9 - Quit")?;
    Ok(())
}

/// Collect dataset name, field list, and one policy per field.
///
/// All parameter validation happens here, before the dataset accepts any
/// entry: unknown policy codes and negative redact lengths are rejected
/// on the spot and re-prompted. Returns `None` if input ends mid-setup.
fn setup_session<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
) -> ShellResult<Option<Dataset>> {
    let name = loop {
        match read_trimmed(
            input,
            output,
            "Enter the dataset name (e.g., patients, customers): ",
        )? {
            None => return Ok(None),
            Some(s) if s.is_empty() => writeln!(output, "Dataset name cannot be empty.")?,
            Some(s) => break s,
        }
    };

    let fields = loop {
        match read_trimmed(
            input,
            output,
            "Enter the fields to include (comma-separated, e.g., name, ssn, email): ",
        )? {
            None => return Ok(None),
            Some(s) => {
                let mut fields: Vec<FieldName> = Vec::new();
                for part in s.split(',') {
                    let field = FieldName::new(part);
                    if !field.is_empty() && !fields.contains(&field) {
                        fields.push(field);
                    }
                }
                if fields.is_empty() {
                    writeln!(output, "Fields cannot be empty.")?;
                } else {
                    break fields;
                }
            }
        }
    };

    writeln!(output, "Choose a masking option for each field:")?;
    writeln!(output, "0 - none (pass through)")?;
    writeln!(output, "1 - pseudonymize (deterministic replacement)")?;
    writeln!(output, "2 - tokenize (keyed one-way digest)")?;
    writeln!(output, "3 - redact (keep only the last N characters)")?;
    writeln!(output, "4 - mask (substitute a synthetic value)")?;

    let mut policies = PolicyMap::new();
    for field in &fields {
        let policy = loop {
            let choice = match read_trimmed(input, output, &format!("{}: ", field))? {
                None => return Ok(None),
                Some(s) => s,
            };
            let code = match choice.as_str() {
                "0" => "none",
                "1" => "pseudonymize",
                "2" => "tokenize",
                "3" => "redact",
                "4" => "mask",
                _ => {
                    writeln!(output, "Invalid option. Choose 0, 1, 2, 3, or 4.")?;
                    continue;
                }
            };

            if code == "mask" {
                let category = match read_trimmed(
                    input,
                    output,
                    &format!(
                        "What type of data is {}? (phone, email, address, credit card, date, or other): ",
                        field
                    ),
                )? {
                    None => return Ok(None),
                    Some(s) => MaskCategory::parse(&s),
                };
                break FieldPolicy::Mask { category };
            }

            if code == "redact" {
                match read_trimmed(
                    input,
                    output,
                    "How many characters stay visible at the end? ",
                )? {
                    None => return Ok(None),
                    Some(s) => match s.parse::<i64>() {
                        Ok(n) => match FieldPolicy::from_code("redact", Some(n), None) {
                            Ok(policy) => break policy,
                            Err(e) => writeln!(output, "{}", e)?,
                        },
                        Err(_) => writeln!(output, "Enter a whole number.")?,
                    },
                }
                continue;
            }

            break FieldPolicy::from_code(code, None, None)?;
        };
        policies.set(field.clone(), policy);
    }

    let engine = MaskingEngine::new(Arc::new(FakeProvider::new()));
    let dataset = Dataset::new(name, fields, policies, engine)?;
    info!(dataset = %dataset.name(), fields = dataset.fields().len(), "session configured");
    Ok(Some(dataset))
}

fn add_entry<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    dataset: &Dataset,
) -> ShellResult<bool> {
    let mut entry = Entry::new();
    for field in dataset.fields() {
        match read_trimmed(input, output, &format!("Enter {}: ", field))? {
            None => return Ok(false),
            Some(value) => {
                entry.insert(field.clone(), value);
            }
        }
    }
    let id = dataset.add_entry(entry)?;
    writeln!(output, "Entry {} added to {}.", id, dataset.name())?;
    Ok(true)
}

fn read_entry_id<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
) -> ShellResult<Option<EntryId>> {
    match read_trimmed(input, output, prompt)? {
        None => Ok(None),
        Some(s) => match s.parse::<u64>() {
            Ok(n) => Ok(Some(EntryId::new(n))),
            Err(_) => {
                writeln!(output, "Invalid entry ID. Enter a valid number.")?;
                Ok(None)
            }
        },
    }
}

fn print_json<W: Write>(output: &mut W, value: &serde_json::Value) -> ShellResult<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| StoreError::Export(format!("render failed: {}", e)))?;
    writeln!(output, "{}", text)?;
    Ok(())
}

/// Run one interactive session from setup through the menu loop.
pub fn run<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    options: &ShellOptions,
) -> ShellResult<()> {
    let dataset = match setup_session(input, output)? {
        None => return Ok(()),
        Some(d) => d,
    };

    loop {
        display_menu(output)?;
        let choice = match read_trimmed(input, output, "Choose an option: ")? {
            None => return Ok(()),
            Some(s) => s,
        };

        let result = match choice.as_str() {
            "1" => {
                // A `false` return means input ended mid-entry; nothing
                // was stored and the loop will see EOF next.
                add_entry(input, output, &dataset).map(|_| ())
            }
            "2" => match read_entry_id(input, output, "Enter the entry ID to delete: ")? {
                None => Ok(()),
                Some(id) => match dataset.delete_entry(id) {
                    Ok(()) => {
                        writeln!(output, "Entry {} deleted.", id)?;
                        Ok(())
                    }
                    Err(e) => {
                        writeln!(output, "{}", e)?;
                        Ok(())
                    }
                },
            },
            "3" => view_entries(output, &dataset),
            "4" => modify_entry(input, output, &dataset),
            "5" => mask_one(input, output, &dataset),
            "6" => mask_everything(output, &dataset),
            "7" => export_original(output, &dataset, options),
            "8" => export_masked(output, &dataset, options),
            "9" => {
                writeln!(output, "Exiting.")?;
                return Ok(());
            }
            _ => {
                writeln!(output, "Invalid choice. Select a valid option.")?;
                Ok(())
            }
        };
        result?;
    }
}

fn view_entries<W: Write>(output: &mut W, dataset: &Dataset) -> ShellResult<()> {
    writeln!(output, "\nOriginal data:")?;
    match original_dump(dataset) {
        Ok(dump) => print_json(output, &dump)?,
        Err(e) => writeln!(output, "{}", e)?,
    }
    Ok(())
}

fn mask_everything<W: Write>(output: &mut W, dataset: &Dataset) -> ShellResult<()> {
    match dataset.mask_all().and_then(|count| {
        let dump = masked_dump(dataset)?;
        Ok((count, dump))
    }) {
        Ok((count, dump)) => {
            writeln!(output, "Masked {} entries.", count)?;
            print_json(output, &dump)?;
        }
        Err(e) => writeln!(output, "{}", e)?,
    }
    Ok(())
}

fn export_original<W: Write>(
    output: &mut W,
    dataset: &Dataset,
    options: &ShellOptions,
) -> ShellResult<()> {
    let path = options
        .output_dir
        .join(format!("{}_original.txt", dataset.name()));
    match original_dump(dataset).and_then(|dump| save_to_file(&dump, &path)) {
        Ok(()) => writeln!(output, "Original data saved to {}.", path.display())?,
        Err(e) => writeln!(output, "{}", e)?,
    }
    Ok(())
}

fn export_masked<W: Write>(
    output: &mut W,
    dataset: &Dataset,
    options: &ShellOptions,
) -> ShellResult<()> {
    let path = options
        .output_dir
        .join(format!("{}_masked.txt", dataset.name()));
    match dataset
        .mask_all()
        .and_then(|_| masked_dump(dataset))
        .and_then(|dump| save_to_file(&dump, &path))
    {
        Ok(()) => writeln!(output, "Masked data saved to {}.", path.display())?,
        Err(e) => writeln!(output, "{}", e)?,
    }
    Ok(())
}

fn modify_entry<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    dataset: &Dataset,
) -> ShellResult<()> {
    let id = match read_entry_id(input, output, "Enter the entry ID to modify: ")? {
        None => return Ok(()),
        Some(id) => id,
    };
    let field_list = dataset
        .fields()
        .iter()
        .map(|f| f.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let field = match read_trimmed(
        input,
        output,
        &format!("Which field do you want to modify? ({}): ", field_list),
    )? {
        None => return Ok(()),
        Some(s) => FieldName::new(s),
    };
    let value = match read_trimmed(input, output, &format!("Enter the new value for {}: ", field))?
    {
        None => return Ok(()),
        Some(s) => s,
    };

    match dataset.update_field(id, &field, value) {
        Ok(()) => writeln!(output, "Entry {} updated; cached mask discarded.", id)?,
        Err(e) => writeln!(output, "{}", e)?,
    }
    Ok(())
}

fn mask_one<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    dataset: &Dataset,
) -> ShellResult<()> {
    let id = match read_entry_id(input, output, "Enter the entry ID to mask: ")? {
        None => return Ok(()),
        Some(id) => id,
    };

    let already = match dataset.is_masked(id) {
        Ok(b) => b,
        Err(e) => {
            writeln!(output, "{}", e)?;
            return Ok(());
        }
    };

    match dataset.get_masked(id) {
        Ok(masked) => {
            if already {
                writeln!(output, "Entry {} is already masked:", id)?;
            } else {
                writeln!(output, "Masked entry {}:", id)?;
            }
            print_json(output, &entry_dump(dataset.fields(), &masked))?;
        }
        Err(e) => writeln!(output, "{}", e)?,
    }
    Ok(())
}
