pub fn increment_records_created(kind: &'static str, count: usize) {
    metrics::counter!("pawfolio_records_created_total", "kind" => kind).increment(count as u64);
}

pub fn increment_records_updated(kind: &'static str) {
    metrics::counter!("pawfolio_records_updated_total", "kind" => kind).increment(1);
}

pub fn increment_records_deleted(kind: &'static str) {
    metrics::counter!("pawfolio_records_deleted_total", "kind" => kind).increment(1);
}

pub fn increment_validation_failures(kind: &'static str, reason: &'static str) {
    metrics::counter!(
        "pawfolio_validation_failures_total",
        "kind" => kind,
        "reason" => reason
    )
    .increment(1);
}

pub fn set_record_count(kind: &'static str, count: usize) {
    metrics::gauge!("pawfolio_records", "kind" => kind).set(count as f64);
}

pub fn set_pet_count(count: usize) {
    metrics::gauge!("pawfolio_pets_total").set(count as f64);
}
