//! User-facing strings in English, Malayalam and Tamil
//!
//! Only the strings the server or the chat interpreter produce live here;
//! page copy belongs to the client.

use crate::models::AiTask;
use crate::types::{Language, Priority};

/// Static strings for one language
#[derive(Debug)]
pub struct Catalog {
    pub chat_initial_message: &'static str,
    pub chat_image_prompt: &'static str,
    pub crop_not_selected: &'static str,
    pub required_field: &'static str,
    pub ph_warning: &'static str,
    pub error_chat_init_retry: &'static str,
    pub error_send_message: &'static str,
    pub error_recommendations: &'static str,
    pub priority_high: &'static str,
    pub priority_medium: &'static str,
    pub priority_low: &'static str,
}

static EN: Catalog = Catalog {
    chat_initial_message: "Hello! I am Krishi Sakhi, your farming assistant. Ask me anything about your crops, or tell me what you did on the farm today.",
    chat_image_prompt: "Analyze this plant image for diseases or pests.",
    crop_not_selected: "Not selected yet",
    required_field: "This field is required.",
    ph_warning: "The pH value is outside the 6.0 - 7.5 range most crops prefer. Consider soil amendments.",
    error_chat_init_retry: "The assistant is not ready yet. Please try again.",
    error_send_message: "Sorry, something went wrong. Please try again.",
    error_recommendations: "Failed to generate crop recommendations. Please try again.",
    priority_high: "high",
    priority_medium: "medium",
    priority_low: "low",
};

static ML: Catalog = Catalog {
    chat_initial_message: "നമസ്കാരം! ഞാൻ കൃഷി സഖി, നിങ്ങളുടെ കൃഷി സഹായി. നിങ്ങളുടെ വിളകളെക്കുറിച്ച് എന്തും ചോദിക്കാം, അല്ലെങ്കിൽ ഇന്ന് കൃഷിയിടത്തിൽ ചെയ്തത് പറയാം.",
    chat_image_prompt: "ഈ ചെടിയുടെ ചിത്രത്തിൽ രോഗങ്ങളോ കീടങ്ങളോ ഉണ്ടോ എന്ന് വിശകലനം ചെയ്യുക.",
    crop_not_selected: "ഇതുവരെ തിരഞ്ഞെടുത്തിട്ടില്ല",
    required_field: "ഈ ഫീൽഡ് നിർബന്ധമാണ്.",
    ph_warning: "pH മൂല്യം മിക്ക വിളകൾക്കും അനുയോജ്യമായ 6.0 - 7.5 പരിധിക്ക് പുറത്താണ്. മണ്ണ് പരിഷ്കരണം പരിഗണിക്കുക.",
    error_chat_init_retry: "സഹായി ഇതുവരെ തയ്യാറായിട്ടില്ല. വീണ്ടും ശ്രമിക്കുക.",
    error_send_message: "ക്ഷമിക്കണം, എന്തോ പിശക് സംഭവിച്ചു. വീണ്ടും ശ്രമിക്കുക.",
    error_recommendations: "വിള ശുപാർശകൾ തയ്യാറാക്കാൻ കഴിഞ്ഞില്ല. വീണ്ടും ശ്രമിക്കുക.",
    priority_high: "ഉയർന്ന",
    priority_medium: "ഇടത്തരം",
    priority_low: "കുറഞ്ഞ",
};

static TA: Catalog = Catalog {
    chat_initial_message: "வணக்கம்! நான் கிருஷி சகி, உங்கள் விவசாய உதவியாளர். உங்கள் பயிர்களைப் பற்றி எதையும் கேளுங்கள், அல்லது இன்று பண்ணையில் என்ன செய்தீர்கள் என்று சொல்லுங்கள்.",
    chat_image_prompt: "இந்த தாவரப் படத்தில் நோய்கள் அல்லது பூச்சிகள் உள்ளதா என்று பகுப்பாய்வு செய்யவும்.",
    crop_not_selected: "இன்னும் தேர்ந்தெடுக்கப்படவில்லை",
    required_field: "இந்த புலம் கட்டாயமாகும்.",
    ph_warning: "pH மதிப்பு பெரும்பாலான பயிர்களுக்கு ஏற்ற 6.0 - 7.5 வரம்பிற்கு வெளியே உள்ளது. மண் திருத்தங்களைக் கவனியுங்கள்.",
    error_chat_init_retry: "உதவியாளர் இன்னும் தயாராகவில்லை. மீண்டும் முயற்சிக்கவும்.",
    error_send_message: "மன்னிக்கவும், ஏதோ தவறு நடந்தது. மீண்டும் முயற்சிக்கவும்.",
    error_recommendations: "பயிர் பரிந்துரைகளை உருவாக்க முடியவில்லை. மீண்டும் முயற்சிக்கவும்.",
    priority_high: "அதிக",
    priority_medium: "நடுத்தர",
    priority_low: "குறைந்த",
};

/// The string catalog for a language
pub fn catalog(lang: Language) -> &'static Catalog {
    match lang {
        Language::En => &EN,
        Language::Ml => &ML,
        Language::Ta => &TA,
    }
}

/// Kerala districts: key (English) plus Malayalam and Tamil names
const DISTRICTS: &[(&str, &str, &str)] = &[
    ("Alappuzha", "ആലപ്പുഴ", "ஆலப்புழா"),
    ("Ernakulam", "എറണാകുളം", "எர்ணாகுளம்"),
    ("Idukki", "ഇടുക്കി", "இடுக்கி"),
    ("Kannur", "കണ്ണൂർ", "கண்ணூர்"),
    ("Kasaragod", "കാസർഗോഡ്", "காசர்கோடு"),
    ("Kollam", "കൊല്ലം", "கொல்லம்"),
    ("Kottayam", "കോട്ടയം", "கோட்டயம்"),
    ("Kozhikode", "കോഴിക്കോട്", "கோழிக்கோடு"),
    ("Malappuram", "മലപ്പുറം", "மலப்புரம்"),
    ("Palakkad", "പാലക്കാട്", "பாலக்காடு"),
    ("Pathanamthitta", "പത്തനംതിട്ട", "பத்தனம்திட்டா"),
    ("Thiruvananthapuram", "തിരുവനന്തപുരം", "திருவனந்தபுரம்"),
    ("Thrissur", "തൃശ്ശൂർ", "திருச்சூர்"),
    ("Wayanad", "വയനാട്", "வயநாடு"),
];

/// District keys in display order
pub fn district_keys() -> impl Iterator<Item = &'static str> {
    DISTRICTS.iter().map(|(key, _, _)| *key)
}

/// Localized district name; unknown keys are returned unchanged
pub fn district_name(lang: Language, key: &str) -> String {
    DISTRICTS
        .iter()
        .find(|(en, _, _)| *en == key)
        .map(|(en, ml, ta)| match lang {
            Language::En => *en,
            Language::Ml => *ml,
            Language::Ta => *ta,
        })
        .unwrap_or(key)
        .to_string()
}

pub fn priority_label(lang: Language, priority: Priority) -> &'static str {
    let c = catalog(lang);
    match priority {
        Priority::High => c.priority_high,
        Priority::Medium => c.priority_medium,
        Priority::Low => c.priority_low,
    }
}

/// Confirmation spoken and shown after a chat tool-call added a task
pub fn task_confirmation(lang: Language, task: &AiTask) -> String {
    let priority = priority_label(lang, task.priority);
    let time = if task.time.trim().is_empty() {
        match lang {
            Language::En => "Anytime",
            Language::Ml => "എപ്പോൾ വേണമെങ്കിലും",
            Language::Ta => "எந்த நேரத்திலும்",
        }
    } else {
        task.time.as_str()
    };
    match lang {
        Language::En => format!(
            "Okay, I've added the task \"{}\" ({} priority, {}) to your list.",
            task.text, priority, time
        ),
        Language::Ml => format!(
            "ശരി, \"{}\" എന്ന ജോലി നിങ്ങളുടെ ലിസ്റ്റിൽ ചേർത്തു ({} മുൻഗണന, {}).",
            task.text, priority, time
        ),
        Language::Ta => format!(
            "சரி, \"{}\" என்ற பணியை உங்கள் பட்டியலில் சேர்த்துவிட்டேன் ({} முன்னுரிமை, {}).",
            task.text, priority, time
        ),
    }
}

/// Message shown after the farmer picks a crop from a recommendation
pub fn crop_selected(lang: Language, crop: &str) -> String {
    match lang {
        Language::En => format!("{crop} has been set as your main crop. Your dashboard will now show personalized advice."),
        Language::Ml => format!("{crop} നിങ്ങളുടെ പ്രധാന വിളയായി തിരഞ്ഞെടുത്തു. ഡാഷ്ബോർഡിൽ ഇനി വ്യക്തിഗത ഉപദേശങ്ങൾ കാണാം."),
        Language::Ta => format!("{crop} உங்கள் முக்கிய பயிராக அமைக்கப்பட்டது. உங்கள் டாஷ்போர்டு இனி தனிப்பயனாக்கப்பட்ட ஆலோசனைகளைக் காட்டும்."),
    }
}
