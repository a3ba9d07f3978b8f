use crate::reconcile::{Denomination, TicketRecord};

/// Suggests the stub combinations for a fee before any serial is entered.
pub fn denomination_hint(fee: u64) -> String {
    let ten = Denomination::Ten.value();
    let five = Denomination::Five.value();
    let with_tens = if fee % ten == 0 {
        format!("{} × ₱10", fee / ten)
    } else {
        format!("{} × ₱10 + {} × ₱5", fee / ten, (fee % ten) / five)
    };
    format!("For ₱{fee}: Use {with_tens}  |  OR all ₱5: {} × ₱5", fee / five)
}

pub fn quantity_line(record: &TicketRecord) -> String {
    let noun = if record.quantity == 1 { "ticket" } else { "tickets" };
    format!(
        "{} {noun} (₱{})  →  end serial: {}",
        record.quantity,
        record.covered(),
        record.end
    )
}
