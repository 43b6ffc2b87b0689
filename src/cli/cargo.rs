//! Cargo commands: new, list.

use clap::{Subcommand, ValueEnum};
use jiff::Timestamp;
use uuid::Uuid;

use crate::{
    config::Config,
    model::Cargo,
    storage::Storage,
    table::{SortDirection, TableQuery},
};

use super::format::{cargo_table, format_cargo_page};

#[derive(Debug, Subcommand)]
pub enum CargoCommand {
    /// Register a new cargo. Prints its ID.
    New {
        /// Waybill reference (e.g. `176-12345675`). Must be unique.
        reference: String,

        /// Who the shipment is for.
        #[arg(long)]
        customer: String,

        /// Origin airport or city.
        #[arg(long)]
        origin: String,

        /// Destination airport or city.
        #[arg(long)]
        destination: String,
    },

    /// List cargo, one page at a time.
    List {
        /// Only show rows containing this text (any column, case-insensitive).
        #[arg(long)]
        filter: Option<String>,

        /// Column to sort by. Registration order when omitted.
        #[arg(long, value_enum)]
        sort: Option<CargoSortArg>,

        /// Sort descending.
        #[arg(long, requires = "sort")]
        desc: bool,

        /// Page to show, starting at 1.
        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Rows per page. Defaults to `page-size` from the config file.
        #[arg(long)]
        page_size: Option<usize>,
    },
}

/// CLI-facing sort column, mapped to a table header.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CargoSortArg {
    Reference,
    Customer,
    Created,
}

impl CargoSortArg {
    fn header(self) -> &'static str {
        match self {
            Self::Reference => "reference",
            Self::Customer => "customer",
            Self::Created => "created",
        }
    }
}

pub(super) fn run(config: &Config, storage: &Storage, command: CargoCommand) -> Result<(), String> {
    match command {
        CargoCommand::New {
            reference,
            customer,
            origin,
            destination,
        } => cmd_new(storage, &reference, &customer, &origin, &destination),
        CargoCommand::List {
            filter,
            sort,
            desc,
            page,
            page_size,
        } => {
            let table = cargo_table();
            let sort = sort.and_then(|s| table.column_index(s.header())).map(|index| {
                let direction = if desc {
                    SortDirection::Descending
                } else {
                    SortDirection::Ascending
                };
                (index, direction)
            });
            let query = TableQuery {
                filter,
                sort,
                page,
                page_size: page_size.unwrap_or(config.page_size),
            };
            cmd_list(storage, &query)
        }
    }
}

fn cmd_new(
    storage: &Storage,
    reference: &str,
    customer: &str,
    origin: &str,
    destination: &str,
) -> Result<(), String> {
    let reference = reference.trim();
    if reference.is_empty() {
        return Err("reference cannot be empty".to_string());
    }

    let cargo = Cargo {
        id: Uuid::new_v4(),
        reference: reference.to_string(),
        customer: customer.trim().to_string(),
        origin: origin.trim().to_string(),
        destination: destination.trim().to_string(),
        created_at: Timestamp::now(),
    };

    storage
        .create_cargo(&cargo)
        .map_err(|e| format!("failed to register cargo: {e}"))?;

    println!("{}", cargo.id);
    Ok(())
}

fn cmd_list(storage: &Storage, query: &TableQuery) -> Result<(), String> {
    let cargo = storage
        .list_cargo()
        .map_err(|e| format!("failed to list cargo: {e}"))?;

    if cargo.is_empty() {
        println!("No cargo");
        return Ok(());
    }

    let page = cargo_table().query(&cargo, query);
    print!("{}", format_cargo_page(&page));
    Ok(())
}

/// Resolve a cargo reference (UUID, waybill reference, or id prefix) to a cargo.
pub(super) fn resolve_cargo(storage: &Storage, reference: &str) -> Result<Cargo, String> {
    let reference = reference.trim();
    if reference.is_empty() {
        return Err("cargo reference cannot be empty".to_string());
    }

    // Try full UUID first.
    if let Ok(id) = reference.parse::<Uuid>() {
        return storage
            .load_cargo(id)
            .map_err(|e| format!("cargo not found: {e}"));
    }

    // Then the waybill reference itself.
    if let Some(cargo) = storage
        .find_cargo_by_reference(reference)
        .map_err(|e| format!("failed to look up cargo: {e}"))?
    {
        return Ok(cargo);
    }

    // Finally, a prefix of the id.
    let all = storage
        .list_cargo()
        .map_err(|e| format!("failed to list cargo: {e}"))?;

    let matches: Vec<&Cargo> = all
        .iter()
        .filter(|c| c.id.to_string().starts_with(reference))
        .collect();

    match matches.as_slice() {
        [] => Err(format!("no cargo matching '{reference}'")),
        [cargo] => Ok((*cargo).clone()),
        many => {
            let ids: Vec<String> = many.iter().map(|c| c.short_id()).collect();
            Err(format!(
                "'{reference}' is ambiguous: matches {} cargo: {}",
                many.len(),
                ids.join(", ")
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    fn storage_with(references: &[&str]) -> (TempDir, Storage, Vec<Cargo>) {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path().join("waybill")).unwrap();
        let cargo = references
            .iter()
            .map(|r| {
                let cargo = Cargo {
                    id: Uuid::new_v4(),
                    reference: (*r).to_string(),
                    customer: "Acme".into(),
                    origin: "NBO".into(),
                    destination: "LHR".into(),
                    created_at: Timestamp::now(),
                };
                storage.create_cargo(&cargo).unwrap();
                cargo
            })
            .collect();
        (dir, storage, cargo)
    }

    #[test]
    fn resolves_by_uuid_reference_and_prefix() {
        let (_dir, storage, cargo) = storage_with(&["176-1", "176-2"]);

        let by_id = resolve_cargo(&storage, &cargo[0].id.to_string()).unwrap();
        assert_eq!(by_id.reference, "176-1");

        let by_reference = resolve_cargo(&storage, "176-2").unwrap();
        assert_eq!(by_reference.id, cargo[1].id);

        let by_prefix = resolve_cargo(&storage, &cargo[1].short_id()).unwrap();
        assert_eq!(by_prefix.id, cargo[1].id);
    }

    #[test]
    fn prefix_shared_by_several_cargo_is_ambiguous() {
        let (_dir, storage, _cargo) = storage_with(&[]);
        for (n, reference) in [(1, "176-1"), (2, "176-2")] {
            let cargo = Cargo {
                id: Uuid::from_u128(n),
                reference: reference.into(),
                customer: "Acme".into(),
                origin: "NBO".into(),
                destination: "LHR".into(),
                created_at: Timestamp::now(),
            };
            storage.create_cargo(&cargo).unwrap();
        }

        let err = resolve_cargo(&storage, "0000").unwrap_err();
        assert!(err.contains("ambiguous"), "{err}");
    }

    #[test]
    fn blank_reference_is_rejected_even_with_one_cargo() {
        let (_dir, storage, _cargo) = storage_with(&["176-1"]);

        for blank in ["", "   "] {
            let err = resolve_cargo(&storage, blank).unwrap_err();
            assert_eq!(err, "cargo reference cannot be empty");
        }
    }

    #[test]
    fn unknown_reference_is_an_error() {
        let (_dir, storage, _cargo) = storage_with(&["176-1"]);

        let err = resolve_cargo(&storage, "zzz").unwrap_err();
        assert_eq!(err, "no cargo matching 'zzz'");
    }
}
