//! Built-in technology skill catalog
//!
//! Skills whose bare name is an everyday word (go, spring, solid) are listed
//! under a longer form. `swift` and `oracle` stay bare and can still match
//! ordinary prose.

use super::{CatalogSource, SkillCategory};

const LANGUAGES: &[(&str, &[&str])] = &[
    ("python", &["python3"]),
    ("java", &[]),
    ("javascript", &["js", "ecmascript"]),
    ("typescript", &["ts"]),
    ("c++", &["cpp"]),
    ("c#", &["csharp", "c sharp"]),
    ("golang", &["go lang"]),
    ("rust", &["rustlang"]),
    ("php", &[]),
    ("ruby", &[]),
    ("swift", &[]),
    ("kotlin", &[]),
    ("scala", &[]),
    ("perl", &[]),
    ("groovy", &[]),
    ("elixir", &[]),
    ("haskell", &[]),
    ("clojure", &[]),
    ("dart", &[]),
    ("matlab", &[]),
    ("objective-c", &["objc"]),
    ("vb.net", &[]),
    ("bash", &["shell scripting"]),
    ("powershell", &[]),
    ("sql", &[]),
];

const FRONTEND: &[(&str, &[&str])] = &[
    ("react", &["reactjs", "react.js"]),
    ("react native", &[]),
    ("angular", &["angularjs", "angular.js"]),
    ("vue", &["vue.js", "vuejs"]),
    ("svelte", &[]),
    ("next.js", &["nextjs"]),
    ("nuxt", &["nuxt.js", "nuxtjs"]),
    ("jquery", &[]),
    ("flutter", &[]),
    ("html", &["html5"]),
    ("css", &["css3"]),
    ("sass", &["scss"]),
    ("tailwind", &["tailwindcss", "tailwind css"]),
    ("bootstrap", &[]),
    ("redux", &[]),
    ("webpack", &[]),
    ("vite", &[]),
];

const BACKEND: &[(&str, &[&str])] = &[
    ("node.js", &["nodejs"]),
    ("express.js", &["expressjs"]),
    ("nestjs", &["nest.js"]),
    ("django", &[]),
    ("flask", &[]),
    ("fastapi", &[]),
    ("spring framework", &["spring mvc"]),
    ("spring boot", &["springboot"]),
    ("laravel", &[]),
    ("symfony", &[]),
    ("ruby on rails", &["rails"]),
    (".net", &["dotnet", ".net core"]),
    ("asp.net", &["aspnet"]),
    ("hibernate", &[]),
    ("graphql", &[]),
    ("grpc", &[]),
    ("rabbitmq", &[]),
    ("actix", &["actix-web"]),
    ("axum", &[]),
];

const DATABASES: &[(&str, &[&str])] = &[
    ("postgresql", &["postgres"]),
    ("mysql", &[]),
    ("mariadb", &[]),
    ("sqlite", &[]),
    ("oracle", &["oracle database"]),
    ("sql server", &["mssql"]),
    ("mongodb", &["mongo"]),
    ("redis", &[]),
    ("cassandra", &[]),
    ("elasticsearch", &["elastic search"]),
    ("dynamodb", &[]),
    ("firebase", &["firestore"]),
    ("neo4j", &[]),
    ("couchdb", &[]),
    ("influxdb", &[]),
    ("nosql", &[]),
];

const CLOUD_DEVOPS: &[(&str, &[&str])] = &[
    ("aws", &["amazon web services"]),
    ("azure", &["microsoft azure"]),
    ("gcp", &["google cloud", "google cloud platform"]),
    ("docker", &[]),
    ("docker compose", &[]),
    ("kubernetes", &["k8s"]),
    ("helm", &[]),
    ("terraform", &[]),
    ("ansible", &[]),
    ("jenkins", &[]),
    ("gitlab ci", &[]),
    ("github actions", &[]),
    ("circleci", &[]),
    ("ci/cd", &["cicd", "ci-cd", "continuous integration"]),
    ("prometheus", &[]),
    ("grafana", &[]),
    ("nginx", &[]),
    ("linux", &[]),
    ("openshift", &[]),
    ("cloudformation", &[]),
];

const DATA_AI: &[(&str, &[&str])] = &[
    ("machine learning", &["ml"]),
    ("deep learning", &["dl"]),
    ("nlp", &["natural language processing"]),
    ("computer vision", &[]),
    ("tensorflow", &[]),
    ("pytorch", &[]),
    ("keras", &[]),
    ("scikit-learn", &["sklearn"]),
    ("pandas", &[]),
    ("numpy", &[]),
    ("scipy", &[]),
    ("xgboost", &[]),
    ("spark", &["apache spark", "pyspark"]),
    ("hadoop", &[]),
    ("kafka", &["apache kafka"]),
    ("airflow", &["apache airflow"]),
    ("llm", &["llms", "large language models"]),
    ("hugging face", &["huggingface"]),
    ("power bi", &["powerbi"]),
    ("tableau", &[]),
    ("data science", &[]),
    ("big data", &[]),
];

const TOOLS: &[(&str, &[&str])] = &[
    ("git", &[]),
    ("github", &[]),
    ("gitlab", &[]),
    ("bitbucket", &[]),
    ("jira", &[]),
    ("confluence", &[]),
    ("postman", &[]),
    ("swagger", &["openapi"]),
    ("maven", &[]),
    ("gradle", &[]),
    ("npm", &[]),
    ("yarn", &[]),
];

const CONCEPTS: &[(&str, &[&str])] = &[
    ("rest api", &["restful", "rest apis", "restful api"]),
    ("microservices", &["microservice"]),
    ("agile", &[]),
    ("scrum", &[]),
    ("kanban", &[]),
    ("tdd", &["test driven development"]),
    ("bdd", &["behavior driven development"]),
    ("ddd", &["domain driven design"]),
    ("devops", &[]),
    ("design patterns", &["design pattern"]),
    ("solid principles", &[]),
    ("event sourcing", &[]),
    ("cqrs", &[]),
    ("oauth", &["oauth2"]),
];

pub(super) fn default_source() -> CatalogSource {
    [
        (SkillCategory::Languages, LANGUAGES),
        (SkillCategory::Frontend, FRONTEND),
        (SkillCategory::Backend, BACKEND),
        (SkillCategory::Databases, DATABASES),
        (SkillCategory::CloudDevops, CLOUD_DEVOPS),
        (SkillCategory::DataAi, DATA_AI),
        (SkillCategory::Tools, TOOLS),
        (SkillCategory::Concepts, CONCEPTS),
    ]
    .into_iter()
    .map(|(category, skills)| {
        let skills = skills
            .iter()
            .map(|(name, synonyms)| {
                (
                    name.to_string(),
                    synonyms.iter().map(|s| s.to_string()).collect(),
                )
            })
            .collect();
        (category, skills)
    })
    .collect()
}
