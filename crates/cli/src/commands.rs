use clap::{Args, Subcommand};

/// Where to load the document from.
#[derive(Args, Debug, Clone)]
pub struct DocumentSource {
    #[arg(long, help = "Path to a document file or a named-document store")]
    pub doc: String,

    #[arg(
        long,
        help = "Entry to load when the file is a store of named documents"
    )]
    pub name: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a document and report its shape
    Validate {
        #[command(flatten)]
        source: DocumentSource,
    },
    /// Print the SQL a document renders to
    Render {
        #[command(flatten)]
        source: DocumentSource,

        #[arg(long, help = "Print the SQL on a single line without formatting")]
        compact: bool,
    },
    /// Print the output columns and their storage types as JSON
    Columns {
        #[command(flatten)]
        source: DocumentSource,
    },
    /// Print the SQL counting the rows a document returns
    Count {
        #[command(flatten)]
        source: DocumentSource,
    },
}
