//! Journal entry commands for CLI.

use std::collections::HashSet;
use std::path::PathBuf;

use clap::Subcommand;
use moodjournal_core::catalog::{Mood, MAX_MOODS_PER_ENTRY};
use moodjournal_core::journal::{JournalEntry, Location, MoodData};
use moodjournal_core::{timestamp, EntryRepository};

use crate::context::{print_json, split_list, AppContext, CliResult};

#[derive(Subcommand)]
pub enum EntryAction {
    /// Record a new entry
    Add {
        /// Mood as LABEL or LABEL:INTENSITY; repeat for up to three moods
        #[arg(long = "mood", required = true)]
        moods: Vec<String>,
        /// Intensity for moods given without one (1-5)
        #[arg(long, default_value = "3")]
        intensity: u8,
        #[arg(long)]
        note: Option<String>,
        /// Comma-separated activity ids
        #[arg(long)]
        activities: Option<String>,
        /// Comma-separated tags
        #[arg(long)]
        tags: Option<String>,
        /// Photo to copy into the journal; repeatable
        #[arg(long = "photo")]
        photos: Vec<PathBuf>,
        /// Voice note file reference
        #[arg(long)]
        voice_note: Option<String>,
        /// Location as LAT,LON[,NAME]
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        private: bool,
        /// Entry date (ISO-8601); defaults to now
        #[arg(long)]
        date: Option<String>,
    },
    /// List entries, newest first
    List {
        /// Only entries with this exact tag
        #[arg(long)]
        tag: Option<String>,
        /// Case-insensitive text search
        #[arg(long)]
        search: Option<String>,
        /// Inclusive lower date bound
        #[arg(long)]
        from: Option<String>,
        /// Inclusive upper date bound
        #[arg(long)]
        to: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Show one entry as JSON
    Show { id: String },
    /// Edit an entry
    Edit {
        id: String,
        /// Replace the moods (LABEL or LABEL:INTENSITY, repeatable)
        #[arg(long = "mood")]
        moods: Vec<String>,
        #[arg(long, default_value = "3")]
        intensity: u8,
        #[arg(long)]
        note: Option<String>,
        /// Replace activities (comma-separated)
        #[arg(long)]
        activities: Option<String>,
        /// Replace tags (comma-separated)
        #[arg(long)]
        tags: Option<String>,
        /// Copy in and attach another photo; repeatable
        #[arg(long = "add-photo")]
        add_photos: Vec<PathBuf>,
        /// Detach a photo reference; its file is deleted; repeatable
        #[arg(long = "remove-photo")]
        remove_photos: Vec<String>,
    },
    /// Delete an entry and its photos
    Delete { id: String },
    /// Toggle the private flag
    Privacy { id: String },
}

/// Parse `LABEL[:INTENSITY]` arguments into mood data; the first is primary.
fn parse_moods(args: &[String], default_intensity: u8) -> CliResult<Vec<MoodData>> {
    if args.len() > MAX_MOODS_PER_ENTRY {
        return Err(format!("at most {MAX_MOODS_PER_ENTRY} moods per entry").into());
    }
    args.iter()
        .enumerate()
        .map(|(i, arg)| -> CliResult<MoodData> {
            let (label, intensity) = match arg.split_once(':') {
                Some((label, n)) => (label.trim(), n.trim().parse::<u8>()?),
                None => (arg.trim(), default_intensity),
            };
            let mood = Mood::from_label(label).ok_or_else(|| format!("unknown mood '{label}'"))?;
            Ok(MoodData {
                mood: mood.label.to_string(),
                intensity,
                primary: i == 0,
            })
        })
        .collect()
}

fn parse_location(raw: &str) -> CliResult<Location> {
    let mut parts = raw.splitn(3, ',');
    let latitude = parts.next().unwrap_or_default().trim().parse::<f64>()?;
    let longitude = parts
        .next()
        .ok_or("location needs LAT,LON")?
        .trim()
        .parse::<f64>()?;
    Ok(Location {
        latitude,
        longitude,
        name: parts.next().unwrap_or_default().trim().to_string(),
    })
}

fn parse_bound(raw: &str) -> CliResult<chrono::DateTime<chrono::Utc>> {
    timestamp::parse_iso(raw).ok_or_else(|| format!("invalid date '{raw}'").into())
}

/// Copy every source into the photo directory. A failed copy removes the
/// ones already made.
fn copy_photos(repo: &EntryRepository<'_>, sources: &[PathBuf]) -> CliResult<Vec<String>> {
    let mut copied = Vec::with_capacity(sources.len());
    for source in sources {
        match repo.save_photo(source) {
            Ok(reference) => copied.push(reference),
            Err(e) => {
                discard_photos(repo, &copied);
                return Err(e.into());
            }
        }
    }
    Ok(copied)
}

fn discard_photos(repo: &EntryRepository<'_>, references: &[String]) {
    for reference in references {
        repo.delete_photo(reference);
    }
}

/// Save `entry`, deleting `copied` photos if the save fails so no file is
/// left without an owning entry.
fn save_owning(
    repo: &EntryRepository<'_>,
    entry: JournalEntry,
    copied: &[String],
) -> CliResult<JournalEntry> {
    repo.save(entry).map_err(|e| {
        discard_photos(repo, copied);
        e.into()
    })
}

/// Narrow `entries` to those whose id also appears in `matches`.
fn keep_ids(entries: &mut Vec<JournalEntry>, matches: Vec<JournalEntry>) {
    let ids: HashSet<String> = matches.into_iter().map(|e| e.id).collect();
    entries.retain(|e| ids.contains(&e.id));
}

fn print_entry_line(entry: &JournalEntry) {
    let moods = if entry.moods.is_empty() {
        entry.mood.clone()
    } else {
        entry
            .moods
            .iter()
            .map(|m| format!("{}({})", m.mood, m.intensity))
            .collect::<Vec<_>>()
            .join(" ")
    };
    let lock = if entry.is_private() { " [private]" } else { "" };
    println!("{}  {}  {moods}{lock}", entry.id, timestamp::day_prefix(&entry.date));
    if let Some(note) = &entry.note {
        println!("    {note}");
    }
}

pub fn run(action: EntryAction) -> CliResult {
    let ctx = AppContext::open_unlocked()?;
    let repo = ctx.entries()?;

    match action {
        EntryAction::Add {
            moods,
            intensity,
            note,
            activities,
            tags,
            photos,
            voice_note,
            location,
            private,
            date,
        } => {
            let moods = parse_moods(&moods, intensity)?;
            let mut entry = JournalEntry::new(moods[0].mood.clone(), moods[0].intensity);
            entry.moods = moods;
            if let Some(date) = date {
                entry.date = timestamp::to_iso(parse_bound(&date)?);
            }
            entry.note = note;
            entry.activities = activities.as_deref().map(split_list);
            entry.tags = tags.as_deref().map(split_list);
            entry.voice_note = voice_note;
            entry.location = location.as_deref().map(parse_location).transpose()?;
            if private {
                entry.is_private = Some(true);
            }
            // Reject bad input before any photo is copied.
            entry.normalize()?;
            let copied = copy_photos(&repo, &photos)?;
            if !copied.is_empty() {
                entry.photos = Some(copied.clone());
            }

            let entry = save_owning(&repo, entry, &copied)?;
            println!("Entry saved: {}", entry.id);
        }
        EntryAction::List {
            tag,
            search,
            from,
            to,
            json,
        } => {
            let mut entries = match (&from, &to) {
                (None, None) => repo.list(),
                _ => {
                    let start = from.as_deref().map(parse_bound).transpose()?;
                    let end = to.as_deref().map(parse_bound).transpose()?;
                    repo.find_in_range(
                        start.unwrap_or(chrono::DateTime::<chrono::Utc>::MIN_UTC),
                        end.unwrap_or(chrono::DateTime::<chrono::Utc>::MAX_UTC),
                    )
                }
            };
            if let Some(tag) = &tag {
                keep_ids(&mut entries, repo.find_by_tag(tag));
            }
            if let Some(query) = &search {
                keep_ids(&mut entries, repo.search(query));
            }
            entries.sort_by(|a, b| b.date.cmp(&a.date));

            if json {
                print_json(&entries)?;
            } else if entries.is_empty() {
                println!("No entries.");
            } else {
                entries.iter().for_each(print_entry_line);
            }
        }
        EntryAction::Show { id } => {
            let entry = repo.get(&id).ok_or_else(|| format!("entry not found: {id}"))?;
            print_json(&entry)?;
        }
        EntryAction::Edit {
            id,
            moods,
            intensity,
            note,
            activities,
            tags,
            add_photos,
            remove_photos,
        } => {
            let mut entry = repo.get(&id).ok_or_else(|| format!("entry not found: {id}"))?;
            if !moods.is_empty() {
                entry.moods = parse_moods(&moods, intensity)?;
            }
            if let Some(note) = note {
                entry.note = Some(note).filter(|n| !n.is_empty());
            }
            if let Some(activities) = activities {
                entry.activities = Some(split_list(&activities));
            }
            if let Some(tags) = tags {
                entry.tags = Some(split_list(&tags));
            }

            entry.normalize()?;

            let copied = copy_photos(&repo, &add_photos)?;
            let mut photos = entry.photos().to_vec();
            photos.retain(|p| !remove_photos.contains(p));
            photos.extend(copied.iter().cloned());
            if entry.photos.is_some() || !photos.is_empty() {
                entry.photos = Some(photos);
            }

            save_owning(&repo, entry, &copied)?;
            println!("Entry updated: {id}");
        }
        EntryAction::Delete { id } => {
            if repo.get(&id).is_none() {
                return Err(format!("entry not found: {id}").into());
            }
            repo.delete(&id)?;
            println!("Entry deleted: {id}");
        }
        EntryAction::Privacy { id } => match repo.toggle_privacy(&id)? {
            Some(true) => println!("Entry {id} is now private"),
            Some(false) => println!("Entry {id} is now visible"),
            None => return Err(format!("entry not found: {id}").into()),
        },
    }
    Ok(())
}
