//! Pure projection of `PortalState` into what the page shows.

use crate::state::PortalState;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WaveButton {
    pub disabled: bool,
    pub spinner: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WaveRow {
    /// Full sender address, shown as the cell tooltip.
    pub address: String,
    pub address_short: String,
    pub message: String,
    pub date: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ViewModel {
    pub draft: String,
    pub wave_button: WaveButton,
    pub show_connect: bool,
    pub total_waves: u64,
    /// Newest first.
    pub rows: Vec<WaveRow>,
}

impl ViewModel {
    /// `offset_at` gives the viewer's UTC offset in effect at a timestamp.
    pub fn project<F>(state: &PortalState, offset_at: F) -> Self
    where
        F: Fn(u64) -> UtcOffset,
    {
        let rows = state
            .waves
            .iter()
            .rev()
            .map(|wave| WaveRow {
                address: wave.sender.0.clone(),
                address_short: truncate_address(&wave.sender.0),
                message: wave.message.clone(),
                date: format_wave_date(wave.timestamp, offset_at(wave.timestamp)),
            })
            .collect();

        Self {
            draft: state.draft.clone(),
            wave_button: WaveButton {
                disabled: state.loading,
                spinner: state.loading,
            },
            show_connect: state.account.is_none(),
            total_waves: state.total_waves,
            rows,
        }
    }
}

/// `0x2c8E...5145`. Anything shorter than eight characters is shown whole.
pub fn truncate_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() < 8 {
        return address.to_owned();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

/// `d/m/yyyy h:m:s`, unpadded, at the viewer's offset.
pub fn format_wave_date(timestamp: u64, offset: UtcOffset) -> String {
    let format = format_description!(
        "[day padding:none]/[month padding:none]/[year] [hour padding:none]:[minute padding:none]:[second padding:none]"
    );
    i64::try_from(timestamp)
        .ok()
        .and_then(|secs| OffsetDateTime::from_unix_timestamp(secs).ok())
        .and_then(|at| at.to_offset(offset).format(format).ok())
        .unwrap_or_else(|| timestamp.to_string())
}
