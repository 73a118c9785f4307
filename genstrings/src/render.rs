//! `.strings` table output

use std::io::{self, Write};

use crate::classify::StringsTable;
use crate::extract::Entry;

pub const SHARED_HEADER: &str = "SHARED STRINGS";

/// Write every file section, then the shared section.
///
/// ```text
/// /*
///  * ./App/Menu.swift
///  */
///
/// /* Menu item title */
/// "Quit" = "Quit";
///
/// ```
pub fn render<W: Write>(table: &StringsTable, out: &mut W) -> io::Result<()> {
    for section in &table.files {
        write_header(out, &section.file.display().to_string())?;
        for entry in &section.entries {
            write_entry(out, entry)?;
        }
    }

    write_header(out, SHARED_HEADER)?;
    for entry in &table.shared {
        write_entry(out, entry)?;
    }

    out.flush()
}

fn write_header<W: Write>(out: &mut W, title: &str) -> io::Result<()> {
    write!(out, "/*\n * {title}\n */\n\n")
}

fn write_entry<W: Write>(out: &mut W, entry: &Entry) -> io::Result<()> {
    if let Some(comment) = &entry.comment {
        writeln!(out, "/* {comment} */")?;
    }
    write!(out, "\"{0}\" = \"{0}\";\n\n", entry.text)
}
