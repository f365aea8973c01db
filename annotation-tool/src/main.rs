mod config;

use annotation::{list_sequences, sequence_path, Access, AnnotationRecord, Disposition, Handle};
use anyhow::{format_err, Context, Result};
use bbox::{prelude::*, XYWH};
use clap::{Parser, Subcommand};
use config::Config;
use log::info;
use prettytable::{cell, row, Table};
use std::{io, path::PathBuf};

#[derive(Debug, Clone, Parser)]
/// Inspect and edit annotation containers
struct Args {
    #[clap(long)]
    /// configuration file
    config: Option<PathBuf>,
    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// List '<sequence>/<sub_sequence>' names of a dataset
    List {
        /// dataset directory, overriding the configuration
        dataset_dir: Option<PathBuf>,
    },
    /// Print a summary and the records of a container
    Info {
        /// container file
        file: PathBuf,
    },
    /// Print the records of a container as JSON
    Dump {
        /// container file
        file: PathBuf,
    },
    /// Print the records of a dataset sequence as JSON
    DumpSequence {
        /// '<sequence>/<sub_sequence>' name
        sequence: String,
        /// dataset directory, overriding the configuration
        #[clap(long)]
        dataset_dir: Option<PathBuf>,
    },
    /// Create an empty container, or truncate an existing one
    Create {
        /// container file
        file: PathBuf,
        /// initial number of records
        #[clap(long, default_value = "0")]
        count: u64,
    },
    /// Change the number of records of a container
    Resize {
        /// container file
        file: PathBuf,
        /// new number of records
        count: u64,
    },
    /// Overwrite one record
    Set {
        /// container file
        file: PathBuf,
        /// record index
        index: u64,
        #[clap(long, default_value = "0")]
        id: i32,
        #[clap(long)]
        labeled: bool,
        /// bounding box as 'x,y,w,h'
        #[clap(long, default_value = "0,0,0,0", parse(try_from_str = parse_bbox))]
        bbox: XYWH<i32>,
        #[clap(long)]
        occlusion: bool,
        #[clap(long)]
        out_of_view: bool,
        /// image path
        #[clap(long, default_value = "")]
        image_path: String,
    },
    /// Drop string heap bytes that no record refers to
    Compact {
        /// container file
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    pretty_env_logger::init();

    let Args { config, command } = Args::parse();
    let config = match config {
        Some(path) => Config::open(&path)
            .with_context(|| format!("failed to load config file '{}'", path.display()))?,
        None => Config::default(),
    };
    let open = |file: &PathBuf, access, disposition| {
        Handle::open_with(file, access, disposition, config.options.clone())
            .with_context(|| format!("failed to open container '{}'", file.display()))
    };

    match command {
        Command::List { dataset_dir } => {
            let dataset_dir = dataset_dir
                .or_else(|| config.dataset_dir.clone())
                .ok_or_else(|| format_err!("dataset directory is not specified"))?;
            list_sequences(&dataset_dir)?
                .into_iter()
                .for_each(|sequence| println!("{}", sequence));
        }
        Command::Info { file } => {
            let handle = open(&file, Access::Read, Disposition::OpenAlways)?;
            print_info(&handle)?;
        }
        Command::Dump { file } => {
            let handle = open(&file, Access::Read, Disposition::OpenAlways)?;
            dump(&handle)?;
        }
        Command::DumpSequence {
            sequence,
            dataset_dir,
        } => {
            let dataset_dir = dataset_dir
                .or_else(|| config.dataset_dir.clone())
                .ok_or_else(|| format_err!("dataset directory is not specified"))?;
            let file = sequence_path(&dataset_dir, &sequence, &config.container_file_name)?;
            let handle = open(&file, Access::Read, Disposition::OpenAlways)?;
            dump(&handle)?;
        }
        Command::Create { file, count } => {
            let mut handle = open(&file, Access::Both, Disposition::CreateAlways)?;
            handle.resize(count)?;
            handle.close()?;
            info!("created '{}' with {} records", file.display(), count);
        }
        Command::Resize { file, count } => {
            let mut handle = open(&file, Access::Write, Disposition::OpenAlways)?;
            let prev = handle.count();
            handle.resize(count)?;
            handle.close()?;
            info!("resized '{}' from {} to {} records", file.display(), prev, count);
        }
        Command::Set {
            file,
            index,
            id,
            labeled,
            bbox,
            occlusion,
            out_of_view,
            image_path,
        } => {
            let record = AnnotationRecord {
                id,
                is_labeled: labeled,
                bbox,
                occlusion,
                out_of_view,
                image_path,
            };
            let mut handle = open(&file, Access::Both, Disposition::OpenAlways)?;
            handle.update(index, &record)?;
            handle.close()?;
        }
        Command::Compact { file } => {
            let mut handle = open(&file, Access::Write, Disposition::OpenAlways)?;
            let reclaimed = handle.compact()?;
            handle.close()?;
            info!("reclaimed {} bytes from '{}'", reclaimed, file.display());
        }
    }

    Ok(())
}

fn print_info(handle: &Handle) -> Result<()> {
    let stats = handle.stats();

    // print container summary
    {
        let mut table = Table::new();
        table.add_row(row!["path", stats.path.display()]);
        table.add_row(row!["records", stats.count]);
        table.add_row(row!["capacity", stats.capacity]);
        table.add_row(row!["heap bytes", stats.heap_size]);
        table.printstd();
    }

    // print records
    {
        let mut table = Table::new();
        table.add_row(row![
            "index",
            "id",
            "labeled",
            "x",
            "y",
            "w",
            "h",
            "area",
            "overlap",
            "occlusion",
            "out of view",
            "image path"
        ]);

        // overlap is the area shared with the box of the previous record
        let mut prev: Option<AnnotationRecord> = None;
        handle
            .records()?
            .enumerate()
            .try_for_each(|(index, record)| -> Result<_> {
                let record = record?;
                let area = match record.rect() {
                    Some(rect) => rect.area().to_string(),
                    None => "invalid".into(),
                };
                let overlap = prev.as_ref().map(|prev| record.overlap(prev)).unwrap_or(0);

                let AnnotationRecord {
                    id,
                    is_labeled,
                    bbox: XYWH { x, y, w, h },
                    occlusion,
                    out_of_view,
                    ref image_path,
                } = record;
                table.add_row(row![
                    index,
                    id,
                    is_labeled,
                    x,
                    y,
                    w,
                    h,
                    area,
                    overlap,
                    occlusion,
                    out_of_view,
                    image_path
                ]);
                prev = Some(record);
                Ok(())
            })?;

        table.printstd();
    }

    Ok(())
}

fn dump(handle: &Handle) -> Result<()> {
    let records: Vec<_> = handle.records()?.collect::<Result<_, _>>()?;
    serde_json::to_writer_pretty(io::stdout().lock(), &records)?;
    println!();
    Ok(())
}

fn parse_bbox(text: &str) -> Result<XYWH<i32>, String> {
    let values: Vec<i32> = text
        .split(',')
        .map(|value| value.trim().parse())
        .collect::<Result<_, _>>()
        .map_err(|err| format!("invalid bounding box '{}': {}", text, err))?;
    let values: [i32; 4] = values
        .try_into()
        .map_err(|_| format!("expect 'x,y,w,h', but get '{}'", text))?;
    Ok(values.into())
}
