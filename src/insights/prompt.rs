//! Prompt construction for the generation service.
//!
//! Three prompts, one per endpoint: a three-category trial summary, the
//! detailed commercial-insight request, and a narrative summarization of
//! previously generated insights. Each substitutes a curated subset of the
//! normalized record, never the raw registry document.

use crate::trial::TrialRecord;

use super::types::ScenarioMetadata;

/// Temperature per prompt kind, matching how deterministic each output
/// needs to be.
pub const SUMMARY_TEMPERATURE: f32 = 0.1;
pub const INSIGHT_TEMPERATURE: f32 = 0.0;
pub const INSIGHT_SUMMARY_TEMPERATURE: f32 = 0.2;

/// The "Ages: {min} to {max}, Sex: {sex}" population line shared by the
/// insight prompts.
pub fn target_population(record: &TrialRecord) -> String {
    format!(
        "Ages: {} to {}, Sex: {}",
        record.minimum_age, record.maximum_age, record.sex
    )
}

/// Three-category analyst summary over a curated subset of the record.
pub fn build_trial_summary_prompt(record: &TrialRecord) -> String {
    let subset = serde_json::json!({
        "nctId": record.nct_id.as_deref().unwrap_or("N/A"),
        "title": record.brief_title.as_deref().unwrap_or("N/A"),
        "officialTitle": record.official_title.as_deref().unwrap_or("N/A"),
        "conditions": record.conditions,
        "interventions": record.interventions,
        "Inclusion Criteria": record.inclusion_criteria,
        "Exclusion Criteria": record.exclusion_criteria,
    });
    let trial_data = serde_json::to_string_pretty(&subset).expect("curated record serializes");

    format!(
        r#"You are an expert clinical trial analyst. Summarize the key aspects of the clinical trial based solely on the provided JSON data. Structure your summary into exactly three categories as specified below. Be concise and factual in your summary.

Trial JSON Data:
```json
{trial_data}
```

Please provide the summary in this format:

1: Specific Diagnosis/Condition(s) Targeted
[List the primary medical condition(s) this trial is focused on, as mentioned in the 'conditions' field within the provided JSON data.]

2: Key Comorbidities or Patient Characteristics (from Eligibility Criteria)
[Based only on the 'Inclusion Criteria' and 'Exclusion Criteria' fields within the provided JSON data, list significant comorbidities, prior treatments, or patient characteristics that determine eligibility. Focus on medical conditions mentioned.]

3: Overall Trial Objective (One Sentence)
[Provide a single sentence summarizing the main goal or purpose of the study, inferring from title, interventions, and conditions within the provided JSON data.]

Give the exact subheadings based on the summaries you are giving for these 3 categories.
"#
    )
}

/// Required output shape for the detailed insight prompt, including a
/// worked example. Static text, appended after the formatted header.
const INSIGHT_OUTPUT_FORMAT: &str = r#"Return the following insights in the below JSON Format ONLY:
{
  "BroadMarketDefinition": {
    "BroadMarketDescription": "",
    "ICDCodes": []
  },
  "AddressableMarketDefinition": "A brief blurb summarizing how we will define the addressable market (e.g., this will be along the lines of 'In order to identify...')",
  "AddressableMarketCriteriaByPatientAttribute": {
    "AgeCriteria": {
      "AgeCriteria": "Age criteria value",
      "AgeCriteriaDescription": "Includes most commonly diagnosed for this condition"
    },
    "Age": {
      "AgeGroup1": { "AgeGroup1": "Group 1 Name" },
      "AgeGroup2": { "AgeGroup2": "Group 2 Name" }
    },
    "Gender": "Male, Female, Both or Does not apply",
    "GenderDescription": "This condition is observed in both males and females",
    "AdditionalICDCodesRequired": {
      "Group1": {
        "GroupName": "Group 1 Name",
        "GroupDescription": "Description of Group 1",
        "ICDCodes": []
      },
      "Group2": {
        "GroupName": "Group 2 Name",
        "GroupDescription": "Description of Group 2",
        "ICDCodes": []
      }
    },
    "ICDCodesToExclude": {
      "Group1": {
        "GroupName": "Exclusion Group 1 Name",
        "GroupDescription": "Description of Exclusion Group 1",
        "ICDCodes": []
      },
      "Group2": {
        "GroupName": "Exclusion Group 2 Name",
        "GroupDescription": "Description of Exclusion Group 2",
        "ICDCodes": []
      }
    }
  }
}

Here is one such example:
{
  "BroadMarketDefinition": {
    "BroadMarketDescription": "Includes all ICD codes related to atrial fibrillation to define the broader market population before applying inclusion/exclusion filters.",
    "ICDCodes": ["I48.0", "I48.11", "I48.19", "I48.2", "I48.20", "I48.21", "I48.3", "I48.4", "I48.91", "I48.92"]
  },
  "AddressableMarketDefinition": "To refine the addressable population, we will stratify atrial fibrillation patients into clinically meaningful subgroups based on comorbidities and trial exclusion patterns observed in real-world data.",
  "AddressableMarketCriteriaByPatientAttribute": {
    "AgeCriteria": {
      "AgeCriteria": "21+",
      "AgeCriteriaDescription": "Includes adult patients aged 21 years and above, in line with typical clinical trial eligibility and disease onset."
    },
    "Age": {
      "AgeGroup1": { "AgeGroup1": "0-18" },
      "AgeGroup2": { "AgeGroup2": "19-36" },
      "AgeGroup3": { "AgeGroup3": "37-54" },
      "AgeGroup4": { "AgeGroup4": "55-72" },
      "AgeGroup5": { "AgeGroup5": "73-90" },
      "AgeGroup6": { "AgeGroup6": "91-100" }
    },
    "Gender": "Both",
    "GenderDescription": "This condition is observed in both males and females",
    "AdditionalICDCodesRequired": {
      "Group1": {
        "GroupName": "Hypertension Comorbidity",
        "GroupDescription": "Patients with concurrent hypertension requiring management",
        "ICDCodes": ["I10", "I11", "I12", "I13", "I15"]
      },
      "Group2": {
        "GroupName": "Heart Failure Comorbidity",
        "GroupDescription": "Patients with coexisting heart failure (systolic/diastolic)",
        "ICDCodes": ["I50", "I50.1", "I50.2", "I50.3", "I50.4"]
      },
      "Group3": {
        "GroupName": "Diabetes Mellitus Comorbidity",
        "GroupDescription": "Patients with type 1/2 diabetes requiring pharmacological management",
        "ICDCodes": ["E10", "E11", "E13"]
      },
      "Group4": {
        "GroupName": "Other Arrhythmias",
        "GroupDescription": "Patients with concurrent supraventricular/ventricular arrhythmias",
        "ICDCodes": ["I47", "I49", "I46", "I44", "I45"]
      }
    },
    "ICDCodesToExclude": {
      "Group1": {
        "GroupName": "Permanent AF Exclusion",
        "GroupDescription": "Patients with permanent AF ineligible for rhythm control strategies",
        "ICDCodes": ["I48.21"]
      },
      "Group2": {
        "GroupName": "Valvular Heart Disease",
        "GroupDescription": "Patients with structural valve abnormalities requiring intervention",
        "ICDCodes": ["I34", "I35", "I36", "I37", "I38"]
      },
      "Group3": {
        "GroupName": "Advanced Renal Disease",
        "GroupDescription": "Patients with stage 4/5 CKD or dialysis dependence",
        "ICDCodes": ["N18.4", "N18.5", "N18.6", "Z99.2"]
      },
      "Group4": {
        "GroupName": "Hepatic Impairment",
        "GroupDescription": "Patients with cirrhosis or severe liver dysfunction",
        "ICDCodes": ["K70", "K71", "K72", "K73", "K74"]
      }
    }
  }
}

IMPORTANT: Populate the JSON structure accurately based only on the provided CLINICAL TRIAL INFORMATION and SCENARIO INFORMATION. Generate valid ICD-10 codes relevant to the clinical descriptions in the criteria. If criteria are vague or don't map clearly to ICD-10, state that in the description and leave the ICDCodes array empty for that section. Fill in the group names and descriptions logically."#;

/// Detailed commercial-insight prompt over the record plus scenario.
pub fn build_insight_prompt(record: &TrialRecord, scenario: &ScenarioMetadata) -> String {
    let header = format!(
        r#"You are a pharmaceutical commercial strategist and market access analyst. Your task is to analyze the following clinical trial data and generate structured, comprehensive, and clinically valid insights tailored for life sciences commercial teams.
Using the provided medical indication name and the corresponding Inclusion and Exclusion Criteria extracted from ClinicalTrials data, identify and compile all relevant ICD-10 codes. Thoroughly interpret the clinical context described in each criterion to determine the appropriate diagnostic codes.
For the inclusion criteria, focus on identifying ICD-10 codes that accurately represent the underlying medical conditions or diagnoses specified. Organize the resulting codes into logically defined groups based on clinical similarity, comorbidities, or related pathologies.
For the exclusion criteria, evaluate each condition or contraindication described, and select corresponding ICD-10 codes that clearly reflect those exclusion parameters. Group these codes meaningfully to mirror the structure and intent of the criteria.
Exclude any codes that refer to medical procedures, surgeries, or adverse events, as the focus should remain strictly on diagnostic classifications.
Ensure that all selected codes are accurate, up-to-date, and aligned with standard classifications, referencing authoritative sources such as the WHO ICD-10 database or equivalent coding guidelines.
Carefully examine the inclusion and exclusion criteria to extract:
1. Age Groups - Analyze the clinical condition specified in the trial and categorize participants into meaningful age groups. While a separate group for ages 65+ can be considered, create 3 to 5 distinct age buckets within the 1-60 age range based on the nature of the disease and the trial's inclusion criteria. Ensure that each age group is clearly defined, contextually relevant, and accurately reflects the trial's requirements.
2. Age Criteria - Review the details related to age mentioned in the inclusion criteria, if available.
3. Gender eligibility, if mentioned (e.g., "All", "Male", "Female").
4. In AddressableMarketDefinition - Analyze the text in the inclusion criteria thoroughly and provide it.
Ensure the extracted insights are based strictly on the given clinical trial data and ICD definitions.

CLINICAL TRIAL INFORMATION:
- Trial ID: {nct_id}
- Title: {brief_title}
- Condition(s): {conditions}
- Intervention(s): {interventions}
- Target Population: {population}
- Inclusion Criteria: {inclusion}
- Exclusion Criteria: {exclusion}
SCENARIO INFORMATION:
- Scenario Name: {scenario_name}
- Indication: {indication}
- Product of Interest: {product}

"#,
        nct_id = record.nct_id.as_deref().unwrap_or("Not specified"),
        brief_title = record.brief_title.as_deref().unwrap_or("Not specified"),
        conditions = record.conditions,
        interventions = record.interventions,
        population = target_population(record),
        inclusion = record.inclusion_criteria,
        exclusion = record.exclusion_criteria,
        scenario_name = scenario.scenario_name,
        indication = scenario.indication,
        product = scenario.product,
    );

    header + INSIGHT_OUTPUT_FORMAT
}

/// Required output shape for the insight summarization prompt.
const INSIGHT_SUMMARY_FORMAT: &str = r#"Example Output Format to Follow Exactly:
```json
{
  "MarketDefinitionSummary": {
    "BroadMarketDefinition": {
      "Description": "All ICD codes related to malignant neoplasm of breast are included to define the broader population.",
      "ICDCodes": [
        "C50.9", "C50.011", "C50.012", "C50.111", "C50.112",
        "C50.211", "C50.212", "C50.311", "C50.312", "C50.411",
        "C50.412", "C50.511", "C50.512", "C50.611", "C50.612",
        "C50.811", "C50.812", "C50.911", "C50.912"
      ]
    },
    "AddressableMarketDefinition": {
      "Description": "Women aged 18 to 85 years with non-metastatic invasive breast carcinoma or carcinoma in situ treated via breast-conserving surgery."
    },
    "PatientAttributes": {
      "AgeRange": "18-85",
      "SubGroups": ["18-40", "41-60", "61-85"],
      "Gender": "Female",
      "ASAClassICDCodes": ["Z02.5", "Z02.6", "Z02.7"]
    },
    "ExclusionICDCodes": [
      "Group 1: Breast Surgery: [Z85.3, Z85.4]",
      "Group 2: Metastatic Carcinoma: [C50.9, C79.81]",
      "Group 3: Allergy/Substance Use: [T88.7, F11.1, Z86.71]",
      "Group 4: Pregnancy/Psychiatric: [O99.3, F99, F02.8]"
    ]
  }
}
```"#;

/// Narrative summarization of previously generated insights.
pub fn build_insight_summary_prompt(insights_json: &str) -> String {
    format!(
        r#"You are a clinical data summarization expert. Given the structured JSON input below describing a clinical market definition, generate a summary in a valid JSON format only.

Your summary must:
- Clearly describe the Broad Market Definition, including all ICD codes.
- Summarize the Addressable Market Definition, outlining age and gender criteria.
- Include Patient Attributes such as age range, sub-groups, gender, and ASA class ICD codes.
- Consolidate all Exclusion ICD Codes, clearly listing them without omitting any codes.

Very Important:
- Return your response strictly as a JSON object using the following structure and key names:
  - "MarketDefinitionSummary"
    - "BroadMarketDefinition": with Description and ICDCodes
    - "AddressableMarketDefinition": with Description
    - "PatientAttributes": with AgeRange, SubGroups, Gender, and ASAClassICDCodes
    - "ExclusionICDCodes": as a flat array containing all exclusion-related ICD codes

- Do not include any explanations, comments, or extra formatting outside the JSON block.
- Do not omit any ICD codes.
CRITICAL:
1. ALWAYS GIVE OUTPUT IN THE BELOW FORMAT ONLY.
2. DO NOT GIVE "UNDEFINED" AS ANY GROUP NAME IF YOU CANNOT FIND THE GROUP.
3. ALWAYS GIVE GROUP NAMES WITH RESPECTIVE KEYS GROUP 1, GROUP 2 ETC.

{format_block}

```json
{insights_json}
```
Concise Narrative Summary of Insights:
"#,
        format_block = INSIGHT_SUMMARY_FORMAT,
        insights_json = insights_json,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> TrialRecord {
        TrialRecord {
            nct_id: Some("NCT01234567".to_string()),
            brief_title: Some("A Study of X".to_string()),
            conditions: "Atrial Fibrillation".to_string(),
            interventions: "Drug: X".to_string(),
            minimum_age: "18 Years".to_string(),
            maximum_age: "75 Years".to_string(),
            sex: "ALL".to_string(),
            inclusion_criteria: "Adults with AF.".to_string(),
            exclusion_criteria: "Severe renal disease.".to_string(),
            ..TrialRecord::default()
        }
    }

    fn sample_scenario() -> ScenarioMetadata {
        ScenarioMetadata {
            indication: "Atrial Fibrillation".to_string(),
            product: "Drug X".to_string(),
            scenario_name: "Launch 2026".to_string(),
        }
    }

    #[test]
    fn target_population_combines_ages_and_sex() {
        assert_eq!(
            target_population(&sample_record()),
            "Ages: 18 Years to 75 Years, Sex: ALL"
        );
    }

    #[test]
    fn summary_prompt_embeds_curated_subset() {
        let prompt = build_trial_summary_prompt(&sample_record());
        assert!(prompt.contains("NCT01234567"));
        assert!(prompt.contains("\"Inclusion Criteria\": \"Adults with AF.\""));
        assert!(prompt.contains("\"Exclusion Criteria\": \"Severe renal disease.\""));
        assert!(prompt.contains("three categories"));
        // The raw registry document never reaches a prompt.
        assert!(!prompt.contains("protocolSection"));
    }

    #[test]
    fn summary_prompt_uses_na_for_absent_identifiers() {
        let prompt = build_trial_summary_prompt(&TrialRecord::default());
        assert!(prompt.contains("\"nctId\": \"N/A\""));
    }

    #[test]
    fn insight_prompt_substitutes_record_and_scenario() {
        let prompt = build_insight_prompt(&sample_record(), &sample_scenario());
        assert!(prompt.contains("- Trial ID: NCT01234567"));
        assert!(prompt.contains("- Target Population: Ages: 18 Years to 75 Years, Sex: ALL"));
        assert!(prompt.contains("- Inclusion Criteria: Adults with AF."));
        assert!(prompt.contains("- Scenario Name: Launch 2026"));
        assert!(prompt.contains("- Product of Interest: Drug X"));
        assert!(prompt.contains("\"BroadMarketDefinition\""));
        assert!(prompt.contains("ICDCodesToExclude"));
    }

    #[test]
    fn insight_prompt_defaults_for_empty_record() {
        let prompt = build_insight_prompt(&TrialRecord::default(), &ScenarioMetadata::default());
        assert!(prompt.contains("- Trial ID: Not specified"));
        assert!(prompt.contains("- Indication: Not Provided"));
    }

    #[test]
    fn insight_summary_prompt_embeds_payload() {
        let prompt = build_insight_summary_prompt("{\"BroadMarketDefinition\": {}}");
        assert!(prompt.contains("{\"BroadMarketDefinition\": {}}"));
        assert!(prompt.contains("MarketDefinitionSummary"));
        assert!(prompt.trim_end().ends_with("Concise Narrative Summary of Insights:"));
    }
}
