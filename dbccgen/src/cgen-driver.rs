/*
 * Copyright (C) 2015-2023 IoT.bzh Company
 * Author: Fulup Ar Foll <fulup@iot.bzh>
 *
 * Redpesk interface code/config use MIT License and can be freely copy/modified even within proprietary code
 * License: $RP_BEGIN_LICENSE$ SPDX:MIT https://opensource.org/licenses/MIT $RP_END_LICENSE$
 */
use crate::error::CgenError;
use crate::filter::post_process;
use crate::gencode::{generate, CGenOptions};
use dbcparser::data::{DbcObject, MessageId};
use std::fs;
use std::path::{Path, PathBuf};

fn file_name(path: &Path) -> Result<String, CgenError> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_owned)
        .ok_or_else(|| CgenError::Config(format!("no file name in {}", path.display())))
}

fn create_parent(path: &Path) -> Result<(), CgenError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

fn write_file(path: &Path, code: &str) -> Result<(), CgenError> {
    fs::write(path, code)?;
    log::info!("wrote {} ({} bytes)", path.display(), code.len());
    Ok(())
}

/// Generate, filter and write C files with the given options.
///
/// # Errors
/// Generator, directory creation and file write errors, unchanged.
pub fn generate_c_files(
    database: &DbcObject,
    database_name: &str,
    source_path: &Path,
    header_path: &Path,
    options: &CGenOptions,
) -> Result<(), CgenError> {
    let header_name = file_name(header_path)?;
    let source_name = file_name(source_path)?;

    log::debug!(
        "generating {}/{} for database:{} ({} messages)",
        header_name,
        source_name,
        database_name,
        database.messages.len()
    );
    let (header, source) = generate(database, database_name, &header_name, &source_name, options)?;

    let header = post_process(&header);
    let source = post_process(&source);

    // both directories exist before the first file is written
    create_parent(header_path)?;
    create_parent(source_path)?;
    write_file(header_path, &header)?;
    write_file(source_path, &source)?;
    Ok(())
}

/// Generate the application C source and header for `database`.
/// Floating point encode/decode helpers are on, bit-fields are off since
/// partial word updates are not atomic.
///
/// # Errors
/// Generator, directory creation and file write errors, unchanged.
pub fn generate_c_code<S: AsRef<Path>, H: AsRef<Path>>(
    database: &DbcObject,
    database_name: &str,
    source_path: S,
    header_path: H,
) -> Result<(), CgenError> {
    let options = CGenOptions { floating_point_numbers: true, bit_fields: false, ..CGenOptions::default() };
    generate_c_files(database, database_name, source_path.as_ref(), header_path.as_ref(), &options)
}

pub struct DbcCGen {
    database_name: String,
    infile: Option<PathBuf>,
    source: Option<PathBuf>,
    header: Option<PathBuf>,
    whitelist: Option<Vec<u32>>,
    blacklist: Option<Vec<u32>>,
    options: CGenOptions,
}

impl DbcCGen {
    #[must_use]
    pub fn new(database_name: &str) -> Self {
        DbcCGen {
            database_name: database_name.to_owned(),
            infile: None,
            source: None,
            header: None,
            whitelist: None,
            blacklist: None,
            options: CGenOptions::default(),
        }
    }

    pub fn dbcfile<P: AsRef<Path>>(&mut self, dbcfile: P) -> &mut Self {
        self.infile = Some(dbcfile.as_ref().to_path_buf());
        self
    }

    pub fn source<P: AsRef<Path>>(&mut self, source: P) -> &mut Self {
        self.source = Some(source.as_ref().to_path_buf());
        self
    }

    pub fn header<P: AsRef<Path>>(&mut self, header: P) -> &mut Self {
        self.header = Some(header.as_ref().to_path_buf());
        self
    }

    /// keep only these CAN ids
    pub fn whitelist(&mut self, canids: Vec<u32>) -> &mut Self {
        self.whitelist = Some(canids);
        self
    }

    /// drop these CAN ids
    pub fn blacklist(&mut self, canids: Vec<u32>) -> &mut Self {
        self.blacklist = Some(canids);
        self
    }

    pub fn options(&mut self, options: CGenOptions) -> &mut Self {
        self.options = options;
        self
    }

    fn check_list(canid: MessageId, list: &[u32]) -> bool {
        list.binary_search(&canid.frame_id()).is_ok()
    }

    /// # Errors
    /// `CgenError::Config` when dbcfile, source or header is missing, then
    /// any parsing or generation error.
    pub fn generate(&mut self) -> Result<(), CgenError> {
        let infile = self.infile.as_ref().ok_or_else(|| CgenError::Config("setting dbcfile is mandatory".to_owned()))?;
        let source = self.source.as_ref().ok_or_else(|| CgenError::Config("setting source is mandatory".to_owned()))?;
        let header = self.header.as_ref().ok_or_else(|| CgenError::Config("setting header is mandatory".to_owned()))?;

        let mut dbcfd = DbcObject::from_file(infile)?;

        if let Some(mut list) = self.whitelist.clone() {
            list.sort_unstable();
            dbcfd.messages.retain(|msg| Self::check_list(msg.id, &list));
        }

        if let Some(mut list) = self.blacklist.clone() {
            list.sort_unstable();
            dbcfd.messages.retain(|msg| !Self::check_list(msg.id, &list));
        }

        generate_c_files(&dbcfd, &self.database_name, source, header, &self.options)
    }
}
