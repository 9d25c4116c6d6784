use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use rental_assistant::admin::status::POLL_INTERVAL;
use rental_assistant::admin::{
    filter_documents, AdminClient, AdminError, ApartmentFilter, Notice, NoticeBoard, StatusPoller,
};
use rental_assistant::config::Config;
use rental_assistant::models::{
    AdminAck, ApartmentUpdate, DocumentUpdate, IndexStatus, NewApartment, NewDocument,
};
use rental_assistant::render;
use tracing::info;

use super::stdin_lines;

#[derive(Debug, Subcommand)]
pub enum AdminCommand {
    /// Show the indexing status
    Status,
    /// Follow the indexing status; type `r` + Enter to reindex, `q` to quit
    Watch,
    /// Rebuild the whole index
    Reindex,
    /// Knowledge-base documents
    #[command(subcommand)]
    Documents(DocumentCommand),
    /// Apartment inventory
    #[command(subcommand)]
    Apartments(ApartmentCommand),
}

#[derive(Debug, Subcommand)]
pub enum DocumentCommand {
    List {
        /// Keep documents whose content or category contains this text
        #[arg(long, default_value = "")]
        query: String,
    },
    Add {
        #[arg(long)]
        content: String,
        #[arg(long, default_value = "")]
        url: String,
        #[arg(long, default_value = "service")]
        category: String,
    },
    Update {
        #[arg(long)]
        id: String,
        #[arg(long)]
        content: Option<String>,
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        category: Option<String>,
    },
    Delete {
        #[arg(long)]
        id: String,
    },
    /// Index a file, split into chunks server-side
    Upload {
        #[arg(long)]
        file: PathBuf,
        #[arg(long, default_value = "service")]
        category: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum ApartmentCommand {
    List {
        #[arg(long)]
        city: Option<String>,
        #[arg(long)]
        rooms: Option<u32>,
        #[arg(long)]
        min_rent: Option<f64>,
        #[arg(long)]
        max_rent: Option<f64>,
    },
    Add(ApartmentFields),
    Update {
        #[arg(long)]
        id: String,
        #[command(flatten)]
        fields: ApartmentFields,
    },
    Delete {
        #[arg(long)]
        id: String,
    },
    /// Import a `.json` or `.jsonl` inventory file
    Upload {
        #[arg(long)]
        file: PathBuf,
    },
}

/// Apartment values; unset ones keep their defaults (add) or current value (update)
#[derive(Debug, Args)]
pub struct ApartmentFields {
    #[arg(long)]
    city: Option<String>,
    #[arg(long)]
    rooms: Option<u32>,
    #[arg(long)]
    rent: Option<f64>,
    #[arg(long)]
    surface: Option<f64>,
    #[arg(long)]
    furnished: Option<bool>,
    #[arg(long)]
    availability_date: Option<String>,
    #[arg(long)]
    energy_label: Option<String>,
    #[arg(long)]
    postal_code: Option<String>,
}

impl ApartmentFields {
    fn into_new(self) -> NewApartment {
        let defaults = NewApartment::default();
        NewApartment {
            city: self.city.unwrap_or(defaults.city),
            rooms: self.rooms.unwrap_or(defaults.rooms),
            rent_cc_eur: self.rent.unwrap_or(defaults.rent_cc_eur),
            surface_m2: self.surface.unwrap_or(defaults.surface_m2),
            furnished: self.furnished.unwrap_or(defaults.furnished),
            availability_date: self.availability_date.unwrap_or(defaults.availability_date),
            energy_label: self.energy_label.unwrap_or(defaults.energy_label),
            postal_code: self.postal_code.unwrap_or(defaults.postal_code),
        }
    }

    fn apply_to(self, update: &mut ApartmentUpdate) {
        let meta = &mut update.metadata;
        if let Some(city) = self.city {
            meta.city = city;
        }
        if let Some(rooms) = self.rooms {
            meta.rooms = rooms;
        }
        if let Some(rent) = self.rent {
            meta.rent_cc_eur = rent;
        }
        if let Some(surface) = self.surface {
            meta.surface_m2 = surface;
        }
        if let Some(furnished) = self.furnished {
            meta.furnished = furnished;
        }
        if let Some(date) = self.availability_date {
            meta.availability_date = date;
        }
        if self.energy_label.is_some() {
            meta.energy_label = self.energy_label;
        }
        if self.postal_code.is_some() {
            meta.postal_code = self.postal_code;
        }
    }
}

pub async fn run(config: &Config, command: AdminCommand) -> Result<ExitCode> {
    let client = AdminClient::new(&config.admin_base_url, config.timeout)?;

    match command {
        AdminCommand::Status => {
            let status = client.status().await.context("Failed to load status")?;
            println!("{}", render::render_status(&status));
            Ok(ExitCode::SUCCESS)
        }
        AdminCommand::Watch => watch_status(client).await,
        AdminCommand::Reindex => Ok(report(client.reindex_all().await)),
        AdminCommand::Documents(command) => documents(&client, command).await,
        AdminCommand::Apartments(command) => apartments(&client, command).await,
    }
}

async fn documents(client: &AdminClient, command: DocumentCommand) -> Result<ExitCode> {
    let result = match command {
        DocumentCommand::List { query } => {
            let documents = client
                .list_documents()
                .await
                .context("Failed to load documents")?;
            let shown = filter_documents(&documents, &query);
            for document in &shown {
                println!("{}", render::render_document(document));
            }
            println!("{} / {} documents", shown.len(), documents.len());
            return Ok(ExitCode::SUCCESS);
        }
        DocumentCommand::Add { content, url, category } => {
            client
                .add_document(&NewDocument { content, url, category })
                .await
        }
        DocumentCommand::Update { id, content, url, category } => {
            client
                .update_document(&DocumentUpdate { id, content, url, category })
                .await
        }
        DocumentCommand::Delete { id } => client.delete_document(&id).await,
        DocumentCommand::Upload { file, category } => {
            client.upload_document(&file, &category).await
        }
    };
    Ok(report(result))
}

async fn apartments(client: &AdminClient, command: ApartmentCommand) -> Result<ExitCode> {
    let result = match command {
        ApartmentCommand::List { city, rooms, min_rent, max_rent } => {
            let inventory = client
                .list_apartments()
                .await
                .context("Failed to load apartments")?;
            let filter = ApartmentFilter { city, rooms, min_rent, max_rent };
            let shown = filter.apply(&inventory);
            for apartment in &shown {
                println!("{}", render::render_inventory(apartment));
            }
            println!("{} / {} appartements", shown.len(), inventory.len());
            return Ok(ExitCode::SUCCESS);
        }
        ApartmentCommand::Add(fields) => client.add_apartment(&fields.into_new()).await,
        ApartmentCommand::Update { id, fields } => {
            let inventory = client
                .list_apartments()
                .await
                .context("Failed to load apartments")?;
            let Some(current) = inventory.into_iter().find(|apt| apt.id == id) else {
                let notice = Notice::error(format!("Appartement {} introuvable", id));
                println!("{}", render::render_notice(&notice));
                return Ok(ExitCode::FAILURE);
            };
            let mut update = ApartmentUpdate::from(current);
            fields.apply_to(&mut update);
            client.update_apartment(&update).await
        }
        ApartmentCommand::Delete { id } => client.delete_apartment(&id).await,
        ApartmentCommand::Upload { file } => client.upload_apartments(&file).await,
    };
    Ok(report(result))
}

/// Print the outcome of a mutating call as a banner
fn report(result: Result<AdminAck, AdminError>) -> ExitCode {
    let notice = Notice::from_result(&result);
    println!("{}", render::render_notice(&notice));
    match result {
        Ok(ack) => {
            if let Some(count) = ack.count {
                info!("{} records affected", count);
            }
            if let Some(chunks) = ack.chunks_count {
                info!("{} chunks indexed", chunks);
            }
            ExitCode::SUCCESS
        }
        Err(_) => ExitCode::FAILURE,
    }
}

/// What woke the watch loop up
enum WatchEvent {
    Status,
    Input(Option<String>),
    Stop,
}

async fn watch_status(client: AdminClient) -> Result<ExitCode> {
    let client = Arc::new(client);
    let poller = StatusPoller::spawn(client.clone(), POLL_INTERVAL);
    let mut updates = poller.subscribe();
    let mut board = NoticeBoard::default();
    let mut lines = stdin_lines();

    loop {
        let event = tokio::select! {
            changed = updates.changed() => match changed {
                Ok(()) => WatchEvent::Status,
                Err(_) => WatchEvent::Stop,
            },
            line = lines.next_line() => WatchEvent::Input(line?),
            _ = tokio::signal::ctrl_c() => WatchEvent::Stop,
        };

        match event {
            WatchEvent::Status => {
                let status = updates.borrow_and_update().clone();
                print_status(&status, &mut board);
            }
            WatchEvent::Input(Some(line)) => match line.trim() {
                "r" => {
                    board.show(Notice::from_result(&client.reindex_all().await));
                    print_status(&poller.latest(), &mut board);
                }
                "q" => break,
                _ => {}
            },
            WatchEvent::Input(None) | WatchEvent::Stop => break,
        }
    }

    poller.stop().await;
    Ok(ExitCode::SUCCESS)
}

fn print_status(status: &IndexStatus, board: &mut NoticeBoard) {
    println!("{}", render::render_status(status));
    if let Some(notice) = board.current() {
        println!("  {}", render::render_notice(notice));
    }
}
