//! Prompt templates for the remote classifier

use crate::Language;

pub fn language_instruction(language: Language) -> &'static str {
    match language {
        Language::English => "Respond in English",
        Language::Hindi => "Respond in Hindi (हिंदी)",
        Language::Telugu => "Respond in Telugu (తెలుగు)",
    }
}

pub fn system_prompt(language: Language) -> String {
    format!(
        "You are an expert at detecting SMS fraud and scams in India. Analyze messages for scam indicators and provide safety recommendations.\n\
         \n\
         You MUST respond with ONLY a valid JSON object - no markdown, no code blocks, no additional text.\n\
         \n\
         Analyze for these threat indicators:\n\
         - Suspicious links (shortened URLs like bit.ly, fake domains)\n\
         - Urgency tactics (immediate action required, threats, deadlines)\n\
         - Requests for personal info (OTP, password, CVV, PIN, Aadhaar)\n\
         - Impersonation (banks, government, courier services, telecom)\n\
         - Too-good-to-be-true offers (lottery wins, prizes, free money)\n\
         - Poor grammar and spelling mistakes\n\
         - Unknown sender numbers\n\
         - Pressure tactics and fear mongering\n\
         \n\
         Risk scoring guidelines:\n\
         - 0-35: LOW risk (legitimate messages, known senders, no suspicious elements)\n\
         - 36-65: MEDIUM risk (some suspicious elements, verify before acting)\n\
         - 66-100: HIGH risk (clear scam indicators, do not engage)\n\
         \n\
         {}",
        language_instruction(language)
    )
}

pub fn user_prompt(message_text: &str, sender_phone: &str) -> String {
    format!(
        r#"Analyze this SMS message for scam indicators:

Message: "{message_text}"
Sender Phone: {sender_phone}

Return a JSON object with this exact structure:
{{
  "riskScore": <number 0-100>,
  "riskLevel": "<LOW or MEDIUM or HIGH>",
  "confidence": <number 0-100>,
  "verdict": "<brief explanation of why this is/isn't a scam>",
  "action": "<what the user should do>",
  "threats": [
    {{
      "title": "<threat name>",
      "description": "<brief description>",
      "severity": "<high or medium or low>"
    }}
  ],
  "senderAnalysis": {{
    "phone": "{sender_phone}",
    "inContacts": false,
    "reportCount": <estimated reports 0-100>,
    "isNew": <boolean>
  }},
  "contentAnalysis": {{
    "hasLinks": <boolean>,
    "linkDomain": "<domain if link present or null>",
    "hasUrgency": <boolean>,
    "grammarScore": <1-10>,
    "keywords": ["<suspicious keywords found>"]
  }},
  "recommendations": {{
    "do": ["<action 1>", "<action 2>", "<action 3>", "<action 4>"],
    "dont": ["<thing to avoid 1>", "<thing to avoid 2>", "<thing to avoid 3>", "<thing to avoid 4>"]
  }}
}}"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_prompt_embeds_message_and_sender() {
        let prompt = user_prompt("Win ₹5 lakhs", "+919876543210");
        assert!(prompt.contains("Message: \"Win ₹5 lakhs\""));
        assert!(prompt.contains("\"phone\": \"+919876543210\""));
        assert!(prompt.contains("\"riskScore\": <number 0-100>"));
    }

    #[test]
    fn test_system_prompt_language() {
        assert!(system_prompt(Language::Telugu).ends_with("Respond in Telugu (తెలుగు)"));
        assert!(system_prompt(Language::English).contains("66-100: HIGH risk"));
    }
}
