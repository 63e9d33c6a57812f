//! CLI for reading and editing XML documents by path

fn main() {
    if let Err(error) = xml_accessor_cli::run() {
        tracing::error!(%error, "xml-accessor failed");
        std::process::exit(1);
    }
}
