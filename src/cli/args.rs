// args.rs - Command line arguments definition

use argh::FromArgs;

#[derive(FromArgs)]
/// ukbprep - UK Biobank phenotype/genotype preparation
pub struct Args {
    /// task to run: join, compile, select (default: join)
    #[argh(option, default = "String::from(\"join\")")]
    pub task: String,

    /// phenotype table (.csv or .tsv) keyed by participant ID
    #[argh(option)]
    pub phenotypes: Option<String>,

    /// genetic link file (.csv, .tsv or Oxford .sample) in genotype row order
    #[argh(option)]
    pub link: Option<String>,

    /// output file (join, compile) or output directory (select)
    #[argh(option)]
    pub output: Option<String>,

    /// output format for joined data: csv, tsv (default: csv)
    #[argh(option, default = "String::from(\"csv\")")]
    pub format: String,

    /// participant ID column of the phenotype table (default: auto-detect)
    #[argh(option)]
    pub phenotype_id_column: Option<String>,

    /// participant ID column of the link file (default: auto-detect)
    #[argh(option)]
    pub link_id_column: Option<String>,

    /// phenotype table format: csv, tsv (default: from extension)
    #[argh(option)]
    pub phenotype_format: Option<String>,

    /// link file format: csv, tsv, sample (default: from extension)
    #[argh(option)]
    pub link_format: Option<String>,

    /// include only phenotype fields matching regex pattern
    #[argh(option)]
    pub include_fields: Option<String>,

    /// exclude phenotype fields matching regex pattern
    #[argh(option)]
    pub exclude_fields: Option<String>,

    /// include only phenotype fields listed in a file (one field per line)
    #[argh(option)]
    pub include_fields_list: Option<String>,

    /// exclude phenotype fields listed in a file (one field per line)
    #[argh(option)]
    pub exclude_fields_list: Option<String>,

    /// link rows without phenotype data: exclude, flag (default: exclude)
    #[argh(option, default = "String::from(\"exclude\")")]
    pub unmatched: String,

    /// directory of per-chromosome SNP tables (.csv) to compile
    #[argh(option)]
    pub chromosome_dir: Option<String>,

    /// file listing SNPs to compile (one rsid per line)
    #[argh(option)]
    pub snps_list: Option<String>,

    /// comma-separated non-SNP columns to carry into the compiled table
    #[argh(option)]
    pub factors: Option<String>,

    /// participant ID column of compiled and selection tables (default: ID_1)
    #[argh(option, default = "String::from(\"ID_1\")")]
    pub id_column: String,

    /// compiled dataset used for feature selection
    #[argh(option)]
    pub data: Option<String>,

    /// class label column for feature selection
    #[argh(option)]
    pub target: Option<String>,

    /// comma-separated columns to drop before feature selection
    #[argh(option)]
    pub drop_columns: Option<String>,

    /// comma-separated selectors: chi2, infogain, mwu, mrmr, jmi (default: chi2,infogain)
    #[argh(option, default = "String::from(\"chi2,infogain\")")]
    pub selectors: String,

    /// selector parameters as selector:key=value[,key=value] (repeatable)
    #[argh(option)]
    pub selector_params: Vec<String>,

    /// number of bootstrap samples (default: 10)
    #[argh(option, default = "10")]
    pub n_bootstraps: usize,

    /// participants per bootstrap sample (default: dataset size)
    #[argh(option)]
    pub n_samples: Option<usize>,

    /// stratify bootstrap samples by the target column
    #[argh(switch)]
    pub stratify: bool,

    /// random seed for bootstrap sampling
    #[argh(option)]
    pub seed: Option<u64>,

    /// reuse bootstrap samples from a previous *_bootstraps.csv
    #[argh(option)]
    pub bootstraps: Option<String>,

    /// name prefix of selection outputs (default: selection)
    #[argh(option, default = "String::from(\"selection\")")]
    pub out_name: String,

    /// number of threads (default: auto-detect)
    #[argh(option)]
    pub threads: Option<usize>,

    /// list available feature selectors and exit
    #[argh(switch)]
    pub list_selectors: bool,

    /// validate inputs without computation (dry run)
    #[argh(switch)]
    pub dry_run: bool,

    /// path to TOML configuration file
    #[argh(option)]
    pub config: Option<String>,

    /// generate sample configuration file and exit
    #[argh(switch)]
    pub generate_config: bool,
}

impl Args {
    /// Arguments with every option at its default, as if no flag was given
    pub fn empty() -> Self {
        Self {
            task: "join".to_string(),
            phenotypes: None,
            link: None,
            output: None,
            format: "csv".to_string(),
            phenotype_id_column: None,
            link_id_column: None,
            phenotype_format: None,
            link_format: None,
            include_fields: None,
            exclude_fields: None,
            include_fields_list: None,
            exclude_fields_list: None,
            unmatched: "exclude".to_string(),
            chromosome_dir: None,
            snps_list: None,
            factors: None,
            id_column: "ID_1".to_string(),
            data: None,
            target: None,
            drop_columns: None,
            selectors: "chi2,infogain".to_string(),
            selector_params: Vec::new(),
            n_bootstraps: 10,
            n_samples: None,
            stratify: false,
            seed: None,
            bootstraps: None,
            out_name: "selection".to_string(),
            threads: None,
            list_selectors: false,
            dry_run: false,
            config: None,
            generate_config: false,
        }
    }
}
