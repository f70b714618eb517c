
use std::collections::HashSet;
use std::io::{self, Write};

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::ident::pascal_case;
use crate::ucd::{Character, Document, Group};

const DISCLAIMER: &str = "// this file is auto generated use 'make generate' to regenerate";
const SECTION: &str = "// Unicode rune enumeration";

/// Source dialect of the generated file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Language {
    /// `package unicode` with a `const ( ... )` block of runes
    #[default]
    Go,
    /// `pub mod unicode { ... }` with `u32` constants
    Rust,
}

impl Language {
    /// Fixed name of the generated file inside the output directory.
    pub fn file_name(&self) -> &'static str {
        match self {
            Language::Go => "data.go",
            Language::Rust => "data.rs",
        }
    }

    fn write_header(&self, w: &mut dyn Write) -> io::Result<()> {
        match self {
            Language::Go => {
                write!(w, "package unicode\n\n\n")?;
                write!(w, "{}\n\n", DISCLAIMER)?;
                writeln!(w, "{}", SECTION)?;
                writeln!(w, "const (")
            }
            Language::Rust => {
                write!(w, "{}\n\n", DISCLAIMER)?;
                writeln!(w, "{}", SECTION)?;
                writeln!(w, "#[allow(non_upper_case_globals)]")?;
                writeln!(w, "pub mod unicode {{")
            }
        }
    }

    fn write_declaration(&self, w: &mut dyn Write, ident: &str, code_point: &str) -> io::Result<()> {
        match self {
            Language::Go => writeln!(w, "    {} rune = 0x{}", ident, code_point),
            Language::Rust => writeln!(w, "    pub const {}: u32 = 0x{};", ident, code_point),
        }
    }

    fn write_footer(&self, w: &mut dyn Write) -> io::Result<()> {
        match self {
            Language::Go => write!(w, ")\n\n"),
            Language::Rust => writeln!(w, "}}"),
        }
    }
}

/// Counters collected while emitting, reported once the run completes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub groups: usize,
    pub skipped_groups: usize,
    pub characters: usize,
    pub declarations: usize,
    pub duplicates: usize,
}

/// Writes one constant per unique identifier, in first-seen order.
///
/// The identifier table is owned by the emitter and shared by primary
/// names and aliases alike; the first code point to claim a name keeps it.
pub struct Emitter<W: Write> {
    writer: W,
    language: Language,
    seen: HashSet<String>,
    summary: Summary,
}

impl<W: Write> Emitter<W> {
    /// Creates the emitter and writes the file header.
    pub fn new(mut writer: W, language: Language) -> Result<Self, Error> {
        language.write_header(&mut writer).map_err(write_error)?;
        Ok(Self {
            writer,
            language,
            seen: HashSet::new(),
            summary: Summary::default(),
        })
    }

    pub fn summary(&self) -> &Summary {
        &self.summary
    }

    pub fn emit_document(&mut self, document: &Document) -> Result<(), Error> {
        for group in &document.repertoire.groups {
            self.emit_group(group)?;
        }
        Ok(())
    }

    pub fn emit_group(&mut self, group: &Group) -> Result<(), Error> {
        if group.is_empty() {
            self.summary.skipped_groups += 1;
            return Ok(());
        }

        tracing::info!(script = %group.script, block = %group.block, "processing group");
        self.summary.groups += 1;
        for character in &group.characters {
            self.emit_character(character)?;
        }
        Ok(())
    }

    pub fn emit_character(&mut self, character: &Character) -> Result<(), Error> {
        if character.code_point.is_empty() {
            tracing::debug!(name = %character.name, "skipping character without a single code point");
            return Ok(());
        }
        self.summary.characters += 1;

        self.declare(&character.name, &character.code_point)?;
        for alias in &character.name_aliases {
            self.declare(&alias.alias, &character.code_point)?;
        }
        Ok(())
    }

    fn declare(&mut self, name: &str, code_point: &str) -> Result<(), Error> {
        let ident = pascal_case(name);
        if ident.is_empty() {
            return Ok(());
        }
        if self.seen.contains(&ident) {
            self.summary.duplicates += 1;
            return Ok(());
        }

        self.language
            .write_declaration(&mut self.writer, &ident, code_point)
            .map_err(write_error)?;
        self.seen.insert(ident);
        self.summary.declarations += 1;
        Ok(())
    }

    /// Closes the declaration block, flushes, and hands back the writer.
    pub fn finish(mut self) -> Result<(W, Summary), Error> {
        self.language
            .write_footer(&mut self.writer)
            .map_err(write_error)?;
        self.writer.flush().map_err(write_error)?;
        Ok((self.writer, self.summary))
    }
}

fn write_error(err: io::Error) -> Error {
    Error::io("write output", err)
}
