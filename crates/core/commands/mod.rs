use std::path::PathBuf;

use crate::{
    app::{self, CredentialSource},
    file,
};

use clap::Subcommand;
use eyre::{eyre, Context};
use log::{info, trace};

/// A known good ISBN used to check a live lookup works.
const VERIFY_ISBN: &str = "1573980137";

#[derive(Subcommand)]
#[non_exhaustive]
pub enum Commands {
    /// Look up the best price and sales rank of an ISBN
    ///
    /// The title is shown as well when the ISBN had to be corrected or converted to an ISBN-10.
    #[clap(arg_required_else_help = true)]
    Lookup {
        /// The ISBN to look up
        isbn: String,
    },
    /// Look up every ISBN in a file, one per line
    ///
    /// A lookup that fails is logged and left blank, the remaining ISBNs are still looked up.
    #[clap(arg_required_else_help = true)]
    Batch {
        /// The file listing the ISBNs
        #[clap(parse(from_os_str))]
        file: PathBuf,
        /// Only write the ISBN-10 and price to the output file
        #[clap(long)]
        price_only: bool,
        /// File to write the results of the lookups to
        #[clap(short, long, parse(from_os_str))]
        output: Option<PathBuf>,
    },
    /// Print the signed URL that looks up an ISBN
    #[clap(arg_required_else_help = true)]
    Encode {
        /// The ISBN to encode
        isbn: String,
    },
    /// Check the check digit of an ISBN and show its ISBN-10 form
    #[clap(arg_required_else_help = true)]
    ValidateIsbn {
        /// The ISBN to validate
        isbn: String,
    },
    /// Check the credential files exist and a lookup succeeds
    Verify,
}

impl Commands {
    pub fn execute(self, credentials: &CredentialSource, quiet: bool) -> eyre::Result<String> {
        match self {
            Commands::Lookup { isbn } => {
                let credentials = credentials.load()?;
                let res = bookrank::lookup_isbn(&isbn, &credentials)
                    .wrap_err("Error looking up ISBN")?;
                Ok(app::render_lookup(&isbn, &res))
            }
            Commands::Batch {
                file,
                price_only,
                output,
            } => {
                if quiet && output.is_none() {
                    return Err(eyre!("Quiet and no output file -- nothing to do!"));
                }

                let isbns = file::read_isbn_list(&file)?;
                trace!("Read {} ISBNs from '{}'", isbns.len(), file.display());

                let credentials = credentials.load()?;
                let rows = app::lookup_all(&isbns, |isbn| bookrank::lookup_isbn(isbn, &credentials));

                if let Some(path) = output {
                    file::write_results(&path, &rows, price_only)?;
                    info!("Results written to '{}'", path.display());
                }

                Ok(if quiet {
                    String::new()
                } else {
                    app::render_table(&rows)
                })
            }
            Commands::Encode { isbn } => {
                let credentials = credentials.load()?;
                let request = bookrank::signed_lookup_request(&isbn, &credentials)?;
                Ok(request.url().to_owned())
            }
            Commands::ValidateIsbn { isbn } => {
                let validation = bookrank::isbn::validate(&isbn)?;
                Ok(app::render_validation(&validation))
            }
            Commands::Verify => {
                let files = credentials.files()?;
                for (what, path) in [
                    ("amazon id", &files.id_file),
                    ("amazon secret key", &files.key_file),
                ] {
                    info!("Checking for {what} file '{}'", path.display());
                    if !path.exists() {
                        return Err(eyre!("Cannot find {what} file: {}", path.display()));
                    }
                }

                info!("Trying ISBN lookup of '{VERIFY_ISBN}'");
                let credentials = credentials.load()?;
                bookrank::lookup_isbn(VERIFY_ISBN, &credentials)
                    .wrap_err("Error trying to lookup a valid ISBN")?;

                Ok("Verification complete! Everything seems in order.".to_owned())
            }
        }
    }
}
