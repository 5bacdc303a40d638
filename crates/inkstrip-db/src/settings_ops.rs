use inkstrip_core::site::{DEFAULT_BANNER_URL, SETTING_BANNER_URL, SETTING_SITE_TITLE};
use redb_bincode::ReadableTable as _;
use tracing::debug;

use crate::{Database, DbResult, LOG_TARGET, settings};

/// Settings every page render needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteSettings {
    pub banner_url: String,
    /// Title override, `None` means the configured default
    pub site_title: Option<String>,
}

impl Database {
    /// Insert or overwrite a setting
    pub async fn set_setting(&self, key: &str, value: &str) -> DbResult<()> {
        self.write_with(|tx| {
            let mut settings_tbl = tx.open_table(&settings::TABLE)?;
            settings_tbl.insert(&key.to_owned(), &value.to_owned())?;
            Ok(())
        })
        .await?;
        debug!(target: LOG_TARGET, %key, %value, "Setting updated");
        Ok(())
    }

    pub async fn remove_setting(&self, key: &str) -> DbResult<()> {
        self.write_with(|tx| {
            let mut settings_tbl = tx.open_table(&settings::TABLE)?;
            settings_tbl.remove(&key.to_owned())?;
            Ok(())
        })
        .await?;
        debug!(target: LOG_TARGET, %key, "Setting removed");
        Ok(())
    }

    pub async fn get_site_settings(&self) -> DbResult<SiteSettings> {
        self.read_with(|tx| {
            let settings_tbl = tx.open_table(&settings::TABLE)?;
            let banner_url = settings_tbl
                .get(&SETTING_BANNER_URL.to_owned())?
                .map(|g| g.value())
                .unwrap_or_else(|| DEFAULT_BANNER_URL.to_owned());
            let site_title = settings_tbl
                .get(&SETTING_SITE_TITLE.to_owned())?
                .map(|g| g.value());
            Ok(SiteSettings {
                banner_url,
                site_title,
            })
        })
        .await
    }
}
