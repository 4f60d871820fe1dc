use std::io;

use moovmoney::{CommandOptions, Config, MoovMoneyClient};

fn required_env(name: &str) -> Result<String, io::Error> {
    std::env::var(name).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{name} environment variable is required"),
        )
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let api_url = required_env("MOOV_API_URL")?;
    let username = required_env("MOOV_USERNAME")?;
    let password = required_env("MOOV_PASSWORD")?;
    let msisdn = required_env("MOOV_MSISDN")?;

    let config = Config::builder(api_url, username, password)
        .test_mode(std::env::var("MOOV_TEST_MODE").is_ok())
        .build()?;
    let client = MoovMoneyClient::new(config)?;

    let details = client
        .subscribers()
        .details(&msisdn, CommandOptions::default())
        .await?;
    for (field, value) in &details {
        println!("{field}: {value}");
    }

    Ok(())
}
