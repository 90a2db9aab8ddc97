//! Record rendering.
//!
//! Catalogue text goes through `escape_markdown`; codes, numbers and the
//! formatter's own labels and markup are inserted as-is.

use crate::models::{GroupRecord, NameRecord, PartRecord};
use crate::query::markdown::escape_markdown;

/// `*english* \(russian\)` for a bilingual pair.
pub fn bilingual(english: &str, russian: &str) -> String {
    format!(
        "*{}* \\({}\\)",
        escape_markdown(english),
        escape_markdown(russian)
    )
}

/// `<code> \- *english* \(russian\)`.
pub fn group_line(group: &GroupRecord) -> String {
    format!(
        "{} \\- {}",
        group.code,
        bilingual(&group.description_en, &group.description_ru)
    )
}

/// Title line for a group shown in detail.
pub fn format_group_header(group: &GroupRecord) -> String {
    format!("Группа {}:\n", group_line(group))
}

/// Full detail of one part.
pub fn format_part(part: &PartRecord, group: Option<&GroupRecord>, name: Option<&NameRecord>) -> String {
    let mut text = format!("Информация о запчасти *{}*:\n", part.part_number);

    if let Some(name) = name {
        text.push_str(&format!(
            "Наименование: {}\n",
            bilingual(&name.name_en, &name.name_ru)
        ));
    }

    text.push_str(&format!("Номер на схеме: *{}*\n", part.key_number));

    if let Some(group) = group {
        text.push_str(&format!("Группа: {}\n", group_line(group)));
    }

    if let Some(quantity) = part.display_quantity() {
        text.push_str(&format!("Количество: *{quantity}*\n"));
    }

    if let Some(remark) = part.remark() {
        text.push_str(&format!("Заметка: *{}*\n", escape_markdown(remark)));
    }

    text
}
