use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "intlang")]
#[command(about = "Provision MediaWiki:Lang pages for every language a wiki supports")]
#[command(version)]
pub struct Args {
    /// Wiki domain whose API to target (e.g. www.wikifunctions.org)
    pub domain: String,

    /// Suppress status output on stderr (page progress still goes to stdout)
    #[arg(short, long)]
    pub quiet: bool,
}
