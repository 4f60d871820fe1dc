use std::io::{self, BufRead, Write};

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
    let amount: f64 = std::env::var("MOOV_AMOUNT")
        .unwrap_or_else(|_| "100".to_owned())
        .parse()?;
    let remarks =
        std::env::var("MOOV_REMARKS").unwrap_or_else(|_| "moovmoney demo payment".to_owned());

    let config = Config::builder(api_url, username, password)
        .test_mode(std::env::var("MOOV_TEST_MODE").is_ok())
        .build()?;
    let client = MoovMoneyClient::new(config)?;

    let created = client
        .otp_payments()
        .create(&msisdn, amount, &remarks, CommandOptions::default())
        .await?;
    let trans_id = created.transaction_id().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidData, "response carries no trans-id")
    })?;
    println!("created: {} (trans-id {trans_id})", created.message());

    print!("OTP received by {msisdn}: ");
    io::stdout().flush()?;
    let mut otp = String::new();
    io::stdin().lock().read_line(&mut otp)?;

    let confirmed = client
        .otp_payments()
        .validate(
            &msisdn,
            amount,
            otp.trim(),
            &trans_id,
            &remarks,
            CommandOptions::default(),
        )
        .await?;
    println!(
        "confirmed: {} (status {:?})",
        confirmed.message(),
        confirmed.status_code()
    );

    Ok(())
}
