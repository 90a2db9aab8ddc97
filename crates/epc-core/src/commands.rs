//! Chat command handlers.
//!
//! The transport hands over the command label and the raw argument text and
//! sends back whatever `Reply` comes out. Nothing here talks to the network.

use tracing::info;

use crate::models::{MediaHandle, QueryResult};
use crate::query::guards::{
    is_plausible_vin, log_preview, normalize_argument, normalize_pattern, normalize_vin,
};
use crate::query::markdown::escape_markdown;
use crate::query::part::lookup_part;
use crate::query::resolve::resolve;
use crate::query::vin::{render_vin_records, vin_records, NO_RESULTS_MESSAGE};
use crate::store::context::CatalogueContext;

const VIN_EXAMPLE: &str = "/vin X4XJA563000000000";
const PART_EXAMPLE: &str = "0K95412205";
const GROUP_EXAMPLE: &str = "клапан";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParseMode {
    MarkdownV2,
    Plain,
}

/// What the transport should send back to the user.
#[derive(Debug)]
pub struct Reply {
    pub text: String,
    pub media: Vec<MediaHandle>,
    pub parse_mode: ParseMode,
}

impl Reply {
    fn markdown(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            media: Vec::new(),
            parse_mode: ParseMode::MarkdownV2,
        }
    }

    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            media: Vec::new(),
            parse_mode: ParseMode::Plain,
        }
    }

    fn from_result(result: QueryResult) -> Self {
        Self {
            text: result.text,
            media: result.media,
            parse_mode: ParseMode::MarkdownV2,
        }
    }

    pub fn parse_mode(&self) -> ParseMode {
        self.parse_mode
    }
}

/// Greeting. `user_mention` is markup already prepared by the transport.
pub fn start(user_mention: &str) -> Reply {
    Reply::markdown(format!(
        "Привет, {user_mention}\\!\n\
         Я кое\\-что знаю про автомобили KIA Sportage первого поколения\\. \
         Назовите мне идентификационный номер автомобиля \\(VIN\\) и я попробую \
         найти о нём информацию\\.\n"
    ))
}

pub fn help() -> Reply {
    Reply::plain(
        "Доступные команды:\n\n\
         /vin - получить информацию об автомобиле по VIN-номеру.\n\
         /part (или /p) - получить информацию о запчасти.\n\
         /group (или /g) - найти группу запчастей по коду или названию.\n",
    )
}

pub fn vin(ctx: &CatalogueContext, user: &str, raw: &str) -> Reply {
    let vin = normalize_vin(raw);
    if vin.is_empty() {
        info!("User {user} sent an empty VIN request");
        return Reply::markdown(format!(
            "Вы забыли написать идентификационный номер автомобиля \\(VIN\\)\\. \
             Попробуйте вот так:\n{VIN_EXAMPLE}\n"
        ));
    }
    if !is_plausible_vin(&vin) {
        info!("User {user} sent a malformed VIN: {}", log_preview(&vin));
        return Reply::markdown(format!(
            "Идентификационный номер автомобиля \\(VIN\\) должен состоять ровно из *17* \
             символов и содержать буквы *JA*\\. Например:\n{VIN_EXAMPLE}\n"
        ));
    }

    info!("User {user} requested VIN {vin}");
    let records = vin_records(ctx, &vin);
    if records.is_empty() {
        return Reply::markdown(NO_RESULTS_MESSAGE);
    }
    Reply::markdown(format!(
        "Результаты поиска VIN *{}*:\n{}",
        escape_markdown(&vin),
        render_vin_records(&records)
    ))
}

pub fn part(ctx: &CatalogueContext, user: &str, label: &str, raw: &str) -> Reply {
    let part_number = normalize_argument(raw);
    if part_number.is_empty() {
        info!("User {user} sent an empty part number");
        return Reply::markdown(format!(
            "Вы забыли написать номер запчасти\\. Попробуйте вот так:\n{} {PART_EXAMPLE}\n",
            escape_markdown(label)
        ));
    }

    info!("User {user} requested part {part_number}");
    let result = lookup_part(ctx, &part_number);
    if result.is_empty() {
        return Reply::markdown("Запчасть с таким номером не найдена\\.");
    }
    Reply::from_result(result)
}

pub fn group(ctx: &CatalogueContext, user: &str, label: &str, raw: &str) -> Reply {
    let pattern = normalize_pattern(raw);
    if pattern.is_empty() {
        info!("User {user} sent an empty group pattern");
        return Reply::markdown(format!(
            "Вы забыли написать код или название группы\\. Попробуйте вот так:\n{} {GROUP_EXAMPLE}\n",
            escape_markdown(label)
        ));
    }

    info!("User {user} requested group {}", log_preview(&pattern));
    let result = resolve(ctx, label, &pattern);
    if result.is_empty() {
        return Reply::markdown(format!(
            "По запросу *{}* ничего не найдено\\.",
            escape_markdown(&pattern)
        ));
    }
    Reply::from_result(result)
}
