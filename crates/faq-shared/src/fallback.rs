//! Fixed localized replies used whenever the model's answer is not used.

/// Missing-information reply (Arabic)
pub const MISSING_INFO_ARABIC: &str = "آسف، المعلومة دي مش متوفرة عندي دلوقتي، بس هتكون متاحة قريب إن شاء الله. ممكن تسأل عن حاجة تانية متعلقة بكلية التجارة جامعة حلوان؟";

/// Missing-information reply (English)
pub const MISSING_INFO_ENGLISH: &str = "Sorry, I don't have this information right now, but it will be available soon. Can you ask about something else related to the Faculty of Commerce at Helwan University?";

/// Off-topic redirect (Arabic)
pub const OFF_TOPIC_ARABIC: &str = "أنا مساعد مخصص لكلية التجارة جامعة حلوان فقط. ممكن تسأل عن البرامج الدراسية (BIS, FMI, SBS)، التقديم، المصاريف، أو أي حاجة تانية متعلقة بالكلية؟";

/// Off-topic redirect (English)
pub const OFF_TOPIC_ENGLISH: &str = "I'm an assistant dedicated to the Faculty of Commerce at Helwan University only. You can ask about the study programs (BIS, FMI, SBS), applications, fees, or anything else related to the college.";

/// Model failure apology (Arabic)
pub const MODEL_ERROR_ARABIC: &str = "آسف، حدث خطأ تقني. يرجى إعادة كتابة سؤالك.";

/// Model failure apology (English)
pub const MODEL_ERROR_ENGLISH: &str = "Sorry, I encountered an error. Please try again.";

/// Crude language pick: any code point above 127 selects Arabic.
///
/// Accented Latin text and emoji also select Arabic.
pub fn is_arabic(text: &str) -> bool {
    text.chars().any(|c| c as u32 > 127)
}

/// Missing-information apology
pub fn compose(is_arabic: bool) -> &'static str {
    if is_arabic {
        MISSING_INFO_ARABIC
    } else {
        MISSING_INFO_ENGLISH
    }
}

/// Missing-information apology in the language of `trigger`
pub fn compose_for(trigger: &str) -> &'static str {
    compose(is_arabic(trigger))
}

/// Redirect for questions the classifier rejected
pub fn compose_off_topic(is_arabic: bool) -> &'static str {
    if is_arabic {
        OFF_TOPIC_ARABIC
    } else {
        OFF_TOPIC_ENGLISH
    }
}

/// Apology for a failed model call
pub fn compose_model_error(is_arabic: bool) -> &'static str {
    if is_arabic {
        MODEL_ERROR_ARABIC
    } else {
        MODEL_ERROR_ENGLISH
    }
}
