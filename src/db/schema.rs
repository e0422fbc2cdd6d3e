diesel::table! {
    companies (id) {
        id -> Integer,
        name -> Text,
        created_at -> Timestamp,
    }
}

diesel::table! {
    partners (id) {
        id -> Integer,
        company_id -> Integer,
        name -> Text,
        percentage -> Double,
        role -> Text,
    }
}

diesel::table! {
    calculations (id) {
        id -> Integer,
        name -> Text,
        company_id -> Integer,
        gross_sales -> Double,
        input_vat -> Double,
        vat_rate -> Double,
        expenses -> Double,
        created_at -> Timestamp,
    }
}

diesel::table! {
    calculation_results (id) {
        id -> Integer,
        calculation_id -> Integer,
        partner_id -> Integer,
        share -> Double,
        irpef -> Double,
        inps -> Double,
        net_income -> Double,
    }
}

diesel::joinable!(partners -> companies (company_id));
diesel::joinable!(calculations -> companies (company_id));
diesel::joinable!(calculation_results -> calculations (calculation_id));
diesel::joinable!(calculation_results -> partners (partner_id));

diesel::allow_tables_to_appear_in_same_query!(
    companies,
    partners,
    calculations,
    calculation_results,
);
