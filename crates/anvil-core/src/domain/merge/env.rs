/// Append the incoming variables after the existing ones.
///
/// Keys are not deduplicated; when a key repeats, most dotenv loaders keep
/// the first occurrence.
pub fn merge(existing: &str, incoming: &str) -> String {
    format!("{existing}\n{incoming}")
}
