//! ISO code and script tables.

use promptline_normalizer::cjk::is_han;
use promptline_protocol::Script;

/// ISO 639-3 → ISO 639-1 for the languages the detector knows.
#[must_use]
pub fn to_iso639_1(code: &str) -> Option<&'static str> {
    let short = match code {
        "afr" => "af",
        "aka" => "ak",
        "amh" => "am",
        "ara" => "ar",
        "aze" => "az",
        "bel" => "be",
        "ben" => "bn",
        "bul" => "bg",
        "cat" => "ca",
        "ces" => "cs",
        "cmn" => "zh",
        "dan" => "da",
        "deu" => "de",
        "ell" => "el",
        "eng" => "en",
        "epo" => "eo",
        "est" => "et",
        "fin" => "fi",
        "fra" => "fr",
        "guj" => "gu",
        "heb" => "he",
        "hin" => "hi",
        "hrv" => "hr",
        "hun" => "hu",
        "hye" => "hy",
        "ind" => "id",
        "ita" => "it",
        "jav" => "jv",
        "jpn" => "ja",
        "kan" => "kn",
        "kat" => "ka",
        "khm" => "km",
        "kor" => "ko",
        "lat" => "la",
        "lav" => "lv",
        "lit" => "lt",
        "mal" => "ml",
        "mar" => "mr",
        "mkd" => "mk",
        "mya" => "my",
        "nep" => "ne",
        "nld" => "nl",
        "nob" => "nb",
        "ori" => "or",
        "pan" => "pa",
        "pes" => "fa",
        "pol" => "pl",
        "por" => "pt",
        "ron" => "ro",
        "rus" => "ru",
        "sin" => "si",
        "slk" => "sk",
        "slv" => "sl",
        "sna" => "sn",
        "spa" => "es",
        "srp" => "sr",
        "swe" => "sv",
        "tam" => "ta",
        "tel" => "te",
        "tgl" => "tl",
        "tha" => "th",
        "tuk" => "tk",
        "tur" => "tr",
        "ukr" => "uk",
        "urd" => "ur",
        "uzb" => "uz",
        "vie" => "vi",
        "yid" => "yi",
        "zul" => "zu",
        _ => return None,
    };
    Some(short)
}

/// Prefer the 2-letter code, fall back to the 3-letter one.
#[must_use]
pub fn resolve_iso(code: &str) -> String {
    to_iso639_1(code).unwrap_or(code).to_string()
}

/// Script written by a language, keyed by the resolved ISO code.
#[must_use]
pub fn script_for_iso(iso: &str) -> Option<Script> {
    let script = match iso {
        "ru" | "uk" | "be" | "bg" | "sr" | "mk" => Script::Cyrillic,
        "ar" | "fa" | "ur" => Script::Arabic,
        "he" | "yi" => Script::Hebrew,
        "hi" | "mr" | "ne" => Script::Devanagari,
        "th" => Script::Thai,
        "ko" => Script::Hangul,
        "zh" => Script::Han,
        "ja" => Script::Mixed,
        "af" | "ak" | "az" | "ca" | "cs" | "da" | "de" | "en" | "eo" | "es" | "et" | "fi"
        | "fr" | "hr" | "hu" | "id" | "it" | "jv" | "la" | "lt" | "lv" | "nb" | "nl" | "pl"
        | "pt" | "ro" | "sk" | "sl" | "sn" | "sv" | "tk" | "tl" | "tr" | "uz" | "vi" | "zu" => {
            Script::Latin
        }
        _ => return None,
    };
    Some(script)
}

/// Han only → Han; Han plus other letters → Mixed; no Han → Unknown.
#[must_use]
pub fn script_from_han_presence(text: &str) -> Script {
    let mut han = false;
    let mut other = false;
    for c in text.chars().filter(|c| c.is_alphabetic()) {
        if is_han(c) {
            han = true;
        } else {
            other = true;
        }
    }
    match (han, other) {
        (true, false) => Script::Han,
        (true, true) => Script::Mixed,
        _ => Script::Unknown,
    }
}
