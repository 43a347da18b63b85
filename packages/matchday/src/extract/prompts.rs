//! Model prompts for candidate extraction.
//!
//! The prompt is German because the source chats are German and the model
//! performs measurably better when asked in the language of the input. The
//! reference date is injected at call time so relative expressions resolve
//! against the sync pass, never against a hard-coded year.

use chrono::NaiveDate;

/// Extraction prompt template. `{reference}` and `{text}` are substituted by
/// [`format_extraction_prompt`].
pub const EXTRACTION_PROMPT: &str = r#"Du bist ein Assistent, der Fußball-Termine aus WhatsApp-Nachrichten extrahiert.

Heutiges Datum: {reference}

Analysiere den folgenden Nachrichtentext und extrahiere alle angekündigten Fußball-Ereignisse (Turniere, Testspiele, Leistungsvergleiche, Training). Ignoriere Absagen, Rückfragen und Smalltalk.

Gib ausschließlich JSON in genau diesem Format aus, ohne Erklärungen und ohne Markdown:
{
    "events": [
        {
            "event_type": "tournament" | "friendly_match" | "training" | "other",
            "date": "YYYY-MM-DD oder null, relative Angaben wie 'Samstag' auf das nächste zukünftige Datum auflösen",
            "time_start": "HH:MM oder null",
            "time_end": "HH:MM oder null",
            "location": "Spielort/Halle/Platz mit Adresse falls genannt, sonst null",
            "organizer": "ausrichtender Verein, sonst null",
            "age_group": "z.B. 'D-Jugend', 'JG2014', 'U12', sonst null",
            "skill_level": "Zahl 1-10, bei Bereichen die untere Grenze, sonst null",
            "entry_fee": "Startgeld in Euro als Zahl, sonst null",
            "contact_name": "Ansprechpartner, sonst null",
            "contact_phone": "Telefonnummer, sonst null",
            "status": "open" | "full"
        }
    ]
}

Regeln:
- Jede eigenständige Ankündigung wird ein eigener Eintrag, auch wenn mehrere in einer Nachricht stehen.
- Erfinde keine Werte; nicht genannte Felder sind null.
- "ausgebucht", "voll" oder "keine Plätze mehr" bedeutet status "full".
- Enthält der Text kein Ereignis, gib {"events": []} aus.

Nachrichtentext:
{text}"#;

/// Render the extraction prompt for one message.
pub fn format_extraction_prompt(reference: NaiveDate, text: &str) -> String {
    EXTRACTION_PROMPT
        .replace("{reference}", &reference.format("%Y-%m-%d").to_string())
        .replace("{text}", text)
}
