use clap::Parser;
use itertools::Itertools;
use patch_harvester::{
    args::{Args, Command},
    client::Client,
    config::ClientConfig,
    harvester::Harvester,
    reference::ReferenceFetcher,
    store::{MatchStore, MATCH_SUBDIR},
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();

    match args.command {
        Command::Matches {
            api_key,
            patch,
            count,
            puuids,
        } => {
            let config = ClientConfig::for_region(args.region, api_key)
                .with_proxy(args.proxy)
                .with_max_retries(args.max_retries);
            let client = Client::new(&config)?;
            let store = MatchStore::new(args.cache_dir.join(MATCH_SUBDIR));
            log::info!("saving patch {} matches under {}", patch, store.root().display());
            let harvester = Harvester::new(&client, store);

            for puuid in puuids.iter().unique() {
                let summary = harvester.harvest(puuid, &patch, count).await?;
                println!("{}", serde_json::to_string(&summary)?);
            }
        }
        Command::Champions {
            patch,
            language,
            champion,
        } => {
            let config = ClientConfig::data_dragon()
                .with_proxy(args.proxy)
                .with_max_retries(args.max_retries);
            let client = Client::new(&config)?;
            let fetcher = ReferenceFetcher::new(client, &patch, &language, &args.cache_dir);

            let Some(data) = fetcher.fetch_champion_data().await else {
                anyhow::bail!("champion data for {} is unavailable", patch);
            };
            let count = data.as_object().map_or(0, |champions| champions.len());
            println!("{} champions cached at {}", count, fetcher.cache_path().display());

            if let Some(id) = champion {
                match fetcher.champion_details(&id).await {
                    Some(details) => println!("{}", serde_json::to_string_pretty(&details)?),
                    None => log::warn!("no details for {}", id),
                }
            }
        }
    }

    Ok(())
}
