use crate::domain::model::PatientCase;

const CLASSIFICATION_RULES: &str = "\
If symptoms suggest a potentially life-threatening cardiovascular, respiratory, or neurological emergency, classify as High risk and Emergency.
If symptoms indicate a moderate concern requiring timely attention but not immediate life-saving intervention, classify as Medium risk and Urgent.
If symptoms are mild and not indicative of a serious condition, classify as Low risk and Routine.";

const RESPONSE_TEMPLATE: &str = "\
Risk Level:
Urgency:
Top 3 Conditions:
1.
2.
3.
Treatment:
1.
2.";

/// Renders the triage instruction prompt for one patient.
pub fn build_prompt(patient: &PatientCase) -> String {
    format!(
        "\nClassify this patient.\n\n\
         Age: {}\n\
         Sex: {}\n\
         Symptoms: {}\n\
         Country: {}\n\
         Travel History: {}\n\n\
         {}\n\n\
         Respond STRICTLY in this format:\n\n\
         {}\n",
        patient.age,
        patient.sex,
        patient.symptoms,
        patient.country,
        patient.travel_history,
        CLASSIFICATION_RULES,
        RESPONSE_TEMPLATE,
    )
}
