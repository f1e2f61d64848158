extern crate clap;
extern crate env_logger;
#[macro_use]
extern crate log;
extern crate picker;

use std::io::{self, BufReader, BufWriter, Write};

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use picker::prelude::*;

//------------------------------------------------------------------------------
fn main() {
    env_logger::builder().format_timestamp_nanos().init();
    if let Err(err) = color_eyre::install() {
        warn!("could not install the error report handler: {err}");
    }

    match real_main() {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(err) => {
            // if downstream pipe is closed, exit silently
            if err
                .downcast_ref::<io::Error>()
                .is_some_and(|e| e.kind() == io::ErrorKind::BrokenPipe)
            {
                std::process::exit(0)
            }
            eprintln!("{err:?}");
            std::process::exit(2)
        }
    }
}

fn real_main() -> Result<i32> {
    let opts = PickerOptions::parse().build();
    debug!("options: {opts:?}");

    //------------------------------------------------------------------------------
    // read entries
    let store = ItemStore::from_bufread(BufReader::new(io::stdin().lock())).wrap_err("reading entries from stdin")?;
    let picker = Picker::from_options(&opts, store);

    if opts.generate_cache {
        let generated = picker.pregenerate_thumbnails();
        info!("pre-generated {generated} thumbnails");
    }

    //------------------------------------------------------------------------------
    // filter mode
    filter(picker, opts.filter.as_deref().unwrap_or_default())
}

fn filter(mut picker: Picker, query: &str) -> Result<i32> {
    picker.set_query(query);

    let mut stdout = BufWriter::new(io::stdout().lock());
    for text in picker.matched_texts() {
        writeln!(stdout, "{text}")?;
    }
    stdout.flush()?;

    Ok(if picker.matched_count() == 0 { 1 } else { 0 })
}
