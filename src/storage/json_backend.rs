use chrono::{DateTime, NaiveDateTime, Utc};
use std::collections::HashSet;
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::{
    core::{
        errors::RentalError,
        utils::{ensure_dir, PathResolver},
    },
    domain::{CollectionStatus, PaymentStatus},
    registry::Registry,
};

use super::{Result, StorageBackend};

const BACKUP_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M";
const TMP_SUFFIX: &str = "tmp";
const DEFAULT_RETENTION: usize = 5;

/// JSON-file persistence rooted at the application data directory.
#[derive(Clone)]
pub struct JsonStorage {
    root: PathBuf,
    registries_dir: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
}

impl JsonStorage {
    pub fn new(root: Option<PathBuf>, retention: Option<usize>) -> Result<Self> {
        let app_root = PathResolver::resolve_base(root);
        ensure_dir(&app_root)?;
        let registries_dir = PathResolver::registries_dir_in(&app_root);
        let backups_dir = PathResolver::backups_dir_in(&app_root);
        ensure_dir(&registries_dir)?;
        ensure_dir(&backups_dir)?;
        Ok(Self {
            root: app_root,
            registries_dir,
            backups_dir,
            retention: retention.unwrap_or(DEFAULT_RETENTION).max(1),
        })
    }

    pub fn new_default() -> Result<Self> {
        Self::new(None, None)
    }

    pub fn base_dir(&self) -> &Path {
        &self.root
    }

    fn backup_dir(&self, name: &str) -> PathBuf {
        self.backups_dir.join(canonical_name(name))
    }

    pub fn backup_path(&self, name: &str, backup_name: &str) -> PathBuf {
        self.backup_dir(name).join(backup_name)
    }

    fn write_backup_file(&self, registry: &Registry, name: &str, note: Option<&str>) -> Result<()> {
        let dir = self.backup_dir(name);
        ensure_dir(&dir)?;
        let timestamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let mut file_stem = format!("{}_{}", canonical_name(name), timestamp);
        if let Some(label) = sanitize_backup_note(note) {
            file_stem.push('_');
            file_stem.push_str(&label);
        }
        let path = dir.join(format!("{}.{}", file_stem, BACKUP_EXTENSION));
        let json = serde_json::to_string_pretty(registry)?;
        write_atomic(&path, &json)?;
        self.prune_backups(name)?;
        Ok(())
    }

    fn backup_existing_file(&self, name: &str, path: &Path) -> Result<()> {
        if !path.exists() {
            return Ok(());
        }
        let dir = self.backup_dir(name);
        ensure_dir(&dir)?;
        let timestamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let backup_name = format!(
            "{}_{}.{}",
            canonical_name(name),
            timestamp,
            BACKUP_EXTENSION
        );
        let backup_path = dir.join(&backup_name);
        fs::copy(path, &backup_path)?;
        self.prune_backups(name)?;
        Ok(())
    }

    fn prune_backups(&self, name: &str) -> Result<()> {
        let backups = self.list_backups(name)?;
        if backups.len() <= self.retention {
            return Ok(());
        }
        for entry in backups.iter().skip(self.retention) {
            let path = self.backup_path(name, entry);
            let _ = fs::remove_file(path);
        }
        Ok(())
    }
}

impl StorageBackend for JsonStorage {
    fn save(&self, registry: &Registry, name: &str) -> Result<()> {
        let path = self.registry_path(name);
        if let Some(parent) = path.parent() {
            ensure_dir(parent)?;
        }
        if path.exists() {
            self.backup_existing_file(name, &path)?;
        }
        let json = serde_json::to_string_pretty(registry)?;
        let tmp = tmp_path(&path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn load(&self, name: &str) -> Result<Registry> {
        let path = self.registry_path(name);
        load_registry_from_path(&path)
    }

    fn registry_path(&self, name: &str) -> PathBuf {
        self.registries_dir
            .join(format!("{}.json", canonical_name(name)))
    }

    fn list_registries(&self) -> Result<Vec<String>> {
        if !self.registries_dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.registries_dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                entries.push(stem.to_string());
            }
        }
        entries.sort();
        Ok(entries)
    }

    fn list_backups(&self, name: &str) -> Result<Vec<String>> {
        let dir = self.backup_dir(name);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(BACKUP_EXTENSION) {
                continue;
            }
            let file_name = match path.file_name().and_then(|stem| stem.to_str()) {
                Some(name) => name.to_string(),
                None => continue,
            };
            entries.push(file_name);
        }
        entries.sort_by(|a, b| parse_backup_timestamp(b).cmp(&parse_backup_timestamp(a)));
        Ok(entries)
    }

    fn backup(&self, registry: &Registry, name: &str, note: Option<&str>) -> Result<()> {
        self.write_backup_file(registry, name, note)
    }

    fn restore(&self, name: &str, backup_name: &str) -> Result<Registry> {
        let backup_path = self.backup_path(name, backup_name);
        if !backup_path.exists() {
            return Err(RentalError::Storage(format!(
                "backup `{}` not found",
                backup_name
            )));
        }
        let target = self.registry_path(name);
        if let Some(parent) = target.parent() {
            ensure_dir(parent)?;
        }
        fs::copy(&backup_path, &target)?;
        load_registry_from_path(&target)
    }
}

pub fn save_registry_to_path(registry: &Registry, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let json = serde_json::to_string_pretty(registry)?;
    let tmp = tmp_path(path);
    write_atomic(&tmp, &json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

pub fn load_registry_from_path(path: &Path) -> Result<Registry> {
    let data = fs::read_to_string(path)?;
    let registry: Registry = serde_json::from_str(&data)?;
    Ok(registry)
}

/// Integrity scan surfaced on load: dangling references and records that
/// satisfy both finalization axes without having been finalized (data
/// imported or hand-edited outside the lifecycle engine).
pub fn registry_warnings(registry: &Registry) -> Vec<String> {
    let client_ids: HashSet<_> = registry.clients.iter().map(|c| c.id).collect();
    let equipment_ids: HashSet<_> = registry.equipment.iter().map(|e| e.id).collect();
    let rental_ids: HashSet<_> = registry.rentals.iter().map(|r| r.id).collect();
    let mut warnings = Vec::new();

    for rental in &registry.rentals {
        if !client_ids.contains(&rental.client_id) {
            warnings.push(format!(
                "rental {} references unknown client {}",
                rental.id, rental.client_id
            ));
        }
        for equipment_id in &rental.equipment_ids {
            if !equipment_ids.contains(equipment_id) {
                warnings.push(format!(
                    "rental {} references unknown equipment {}",
                    rental.id, equipment_id
                ));
            }
        }
        if rental.equipment_ids.is_empty() {
            warnings.push(format!("rental {} has no equipment attached", rental.id));
        }
        if rental.expected_end_date < rental.start_date {
            warnings.push(format!(
                "rental {} ends before it starts ({} < {})",
                rental.id, rental.expected_end_date, rental.start_date
            ));
        }
        if rental.is_active()
            && rental.payment == PaymentStatus::Paid
            && rental.collection == CollectionStatus::Collected
        {
            warnings.push(format!(
                "rental {} is paid and collected but still active; re-run its last transition to finalize",
                rental.id
            ));
        }
    }

    for receivable in &registry.receivables {
        if !rental_ids.contains(&receivable.rental_id) {
            warnings.push(format!(
                "receivable {} references unknown rental {}",
                receivable.id, receivable.rental_id
            ));
        }
    }

    warnings
}

fn canonical_name(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "registry".into()
    } else {
        sanitized
    }
}

fn sanitize_backup_note(note: Option<&str>) -> Option<String> {
    let raw = note?.trim();
    if raw.is_empty() {
        return None;
    }
    let mut sanitized = String::new();
    let mut last_dash = false;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            sanitized.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if ch.is_whitespace() || matches!(ch, '-' | '.') {
            if !sanitized.is_empty() && !last_dash {
                sanitized.push('-');
                last_dash = true;
            }
        }
    }
    let trimmed = sanitized.trim_matches('-').to_string();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

fn parse_backup_timestamp(name: &str) -> Option<DateTime<Utc>> {
    let parts: Vec<&str> = name.split('_').collect();
    if parts.len() < 3 {
        return None;
    }
    let date_part = parts.get(parts.len() - 2)?;
    let time_part = parts.last()?;
    if !is_digits(date_part, 8) || !time_part.ends_with(".json") {
        return None;
    }
    let time_digits = &time_part[..time_part.len() - 5];
    if !is_digits(time_digits, 4) {
        return None;
    }
    let raw = format!("{}{}", date_part, time_digits);
    NaiveDateTime::parse_from_str(&raw, "%Y%m%d%H%M")
        .ok()
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.chars().all(|c| c.is_ascii_digit())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Client, Equipment, Period, Rental};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use tempfile::TempDir;
    use uuid::Uuid;

    fn storage_with_temp_dir() -> (JsonStorage, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let storage =
            JsonStorage::new(Some(temp.path().to_path_buf()), Some(3)).expect("json storage");
        (storage, temp)
    }

    fn sample_registry() -> Registry {
        Registry::new("Sample Rentals")
    }

    #[test]
    fn save_and_load_roundtrip() {
        let (storage, _guard) = storage_with_temp_dir();
        let mut registry = sample_registry();
        registry.add_client(Client::new("Acme", "555-0100"));
        storage.save(&registry, "mainbranch").expect("save registry");
        let loaded = storage.load("mainbranch").expect("load registry");
        assert_eq!(loaded.name, "Sample Rentals");
        assert_eq!(loaded.clients.len(), 1);
    }

    #[test]
    fn backup_writes_timestamped_files() {
        let (storage, _guard) = storage_with_temp_dir();
        let registry = sample_registry();
        storage.save(&registry, "depot").expect("save registry");
        storage
            .backup(&registry, "depot", Some("monthly"))
            .expect("create backup");
        let backups = storage.list_backups("depot").expect("list backups");
        assert!(
            !backups.is_empty(),
            "expected at least one backup file to be created"
        );
    }

    #[test]
    fn restore_brings_back_the_snapshot() {
        let (storage, _guard) = storage_with_temp_dir();
        let mut registry = sample_registry();
        registry.add_client(Client::new("Acme", "555-0100"));
        storage.save(&registry, "depot").expect("save");
        storage.backup(&registry, "depot", None).expect("backup");

        registry.clients.clear();
        storage.save(&registry, "depot").expect("save empty");

        let backups = storage.list_backups("depot").expect("list");
        let restored = storage
            .restore("depot", &backups[backups.len() - 1])
            .expect("restore");
        assert_eq!(restored.clients.len(), 1);
    }

    #[test]
    fn warnings_flag_dangling_references_and_stale_finalization() {
        let mut registry = sample_registry();
        let equipment_id = registry.add_equipment(
            Equipment::new("Mixer").with_price(Period::Daily, Decimal::from(50)),
        );
        let mut rental = Rental::new(
            Uuid::new_v4(), // unknown client
            vec![equipment_id],
            Period::Daily,
            Decimal::from(50),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
        );
        rental.payment = PaymentStatus::Paid;
        rental.collection = CollectionStatus::Collected;
        registry.add_rental(rental);

        let warnings = registry_warnings(&registry);
        assert!(warnings.iter().any(|w| w.contains("unknown client")));
        assert!(warnings.iter().any(|w| w.contains("still active")));
    }
}
