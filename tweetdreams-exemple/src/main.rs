use tweetdreams_core::ingest::FolderIngestor;
use tweetdreams_core::{Credentials, Dream, DreamConfig, DreamError};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Each "data/<friend>.dat" file holds the timeline of one friend,
    // one message per line
    let ingestor = FolderIngestor::new("./data")?;

    // Credentials are mandatory, even for a local corpus
    match Dream::new(&Credentials::default(), ingestor.clone(), DreamConfig::default()) {
        Ok(_) => println!("Should not happen"),
        Err(DreamError::InvalidCredentials) => println!("A session needs a username and a password"),
        Err(e) => return Err(e.into()),
    }

    // Dreams are at most 140 characters long and walk at most 70 words
    let config = DreamConfig::default();
    let mut dream = Dream::new(&Credentials::new("demo", "demo"), ingestor, config)?;

    // The corpus is fetched and the chain is built by the first dream only
    for i in 0..10 {
        match dream.dream(None) {
            Ok(text) => println!("Dream {}: {}", i + 1, text),
            Err(DreamError::EmptyModel) => {
                println!("Nothing to dream about yet, add some .dat files to ./data");
                break;
            }
            Err(e) => return Err(e.into()),
        }
    }

    // Shorter dreams
    if let Ok(text) = dream.dream(Some(5)) {
        println!("Short dream: {}", text);
    }

    Ok(())
}
