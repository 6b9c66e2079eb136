use std::sync::OnceLock;

use serde::Serialize;

// Declaration order is the stable tie-break whenever pillars are ranked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Pillar {
    #[serde(rename = "Liderança")]
    Lideranca,
    #[serde(rename = "Processos")]
    Processos,
    #[serde(rename = "Pessoas e Cultura")]
    PessoasCultura,
    #[serde(rename = "Testes Funcionais")]
    TestesFuncionais,
    #[serde(rename = "Testes Automatizados")]
    TestesAutomatizados,
    #[serde(rename = "Métricas e Indicadores")]
    Metricas,
    #[serde(rename = "Ferramentas e DevOps")]
    Devops,
}

impl Pillar {
    pub const ALL: [Pillar; 7] = [
        Pillar::Lideranca,
        Pillar::Processos,
        Pillar::PessoasCultura,
        Pillar::TestesFuncionais,
        Pillar::TestesAutomatizados,
        Pillar::Metricas,
        Pillar::Devops,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Pillar::Lideranca => "Liderança",
            Pillar::Processos => "Processos",
            Pillar::PessoasCultura => "Pessoas e Cultura",
            Pillar::TestesFuncionais => "Testes Funcionais",
            Pillar::TestesAutomatizados => "Testes Automatizados",
            Pillar::Metricas => "Métricas e Indicadores",
            Pillar::Devops => "Ferramentas e DevOps",
        }
    }
}

impl std::fmt::Display for Pillar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// Must appear verbatim, in order, as the first eight header cells.
pub const METADATA_COLUMNS: [&str; 8] = [
    "UserID",
    "Email",
    "Nome",
    "Empresa",
    "Setor",
    "Time Dedicado de Qualidade",
    "Composição do Time",
    "Área de Atuação",
];

#[derive(Debug, Clone)]
pub struct QuestionDefinition {
    // Exact wording used as the header matching key.
    pub canonical_text: &'static str,
    pub id: &'static str,
    pub pillar: Pillar,
    pub ordinal: usize,
    pub is_textual: bool,
}

// The one free-text question; excluded from every numeric aggregation.
pub const TEXTUAL_QUESTION_ID: &str = "testing13";

pub fn questions() -> &'static [QuestionDefinition] {
    static QUESTIONS: OnceLock<Vec<QuestionDefinition>> = OnceLock::new();
    QUESTIONS.get_or_init(|| {
        QUESTION_TABLE
            .iter()
            .enumerate()
            .map(|(ordinal, (id, pillar, text))| QuestionDefinition {
                canonical_text: text,
                id,
                pillar: *pillar,
                ordinal,
                is_textual: *id == TEXTUAL_QUESTION_ID,
            })
            .collect()
    })
}

pub fn question_by_id(id: &str) -> Option<&'static QuestionDefinition> {
    questions().iter().find(|q| q.id == id)
}

pub fn question_count() -> usize {
    questions().len()
}

// Canonical form for header comparisons: glyph folding (curly quotes,
// ellipsis, en/em dashes), lowercasing, whitespace collapse. Idempotent.
// A missed match silently drops a question's data.
pub fn normalize_header(raw: &str) -> String {
    let mut folded = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{2032}' => folded.push('\''),
            '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{2033}' => folded.push('"'),
            '\u{2026}' => folded.push_str("..."),
            '\u{2013}' | '\u{2014}' | '\u{2212}' => folded.push('-'),
            c if c.is_whitespace() => folded.push(' '),
            c => folded.push(c),
        }
    }
    folded
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

// Truncated question wording for error messages.
pub fn short_label(text: &str) -> String {
    const MAX: usize = 60;
    if text.chars().count() <= MAX {
        text.to_string()
    } else {
        let head: String = text.chars().take(MAX).collect();
        format!("{}...", head.trim_end())
    }
}

type QuestionRow = (&'static str, Pillar, &'static str);

#[rustfmt::skip]
const QUESTION_TABLE: &[QuestionRow] = &[
    // Liderança
    ("leadership1", Pillar::Lideranca, "A liderança patrocina ativamente as iniciativas de qualidade?"),
    ("leadership2", Pillar::Lideranca, "A liderança define metas claras de qualidade para os times?"),
    ("leadership3", Pillar::Lideranca, "Os líderes acompanham indicadores de qualidade em rituais recorrentes?"),
    ("leadership4", Pillar::Lideranca, "A liderança aloca orçamento específico para qualidade de software?"),
    ("leadership5", Pillar::Lideranca, "Decisões de release consideram critérios de qualidade definidos pela liderança?"),
    ("leadership6", Pillar::Lideranca, "A liderança incentiva a comunicação de falhas sem punição?"),
    ("leadership7", Pillar::Lideranca, "Existe um plano de carreira para profissionais de qualidade?"),
    ("leadership8", Pillar::Lideranca, "A liderança participa de retrospectivas sobre incidentes de produção?"),
    ("leadership9", Pillar::Lideranca, "Os gestores conhecem o custo dos defeitos encontrados em produção?"),
    ("leadership10", Pillar::Lideranca, "A liderança promove treinamentos de qualidade para todos os papéis?"),
    ("leadership11", Pillar::Lideranca, "Qualidade é tratada como responsabilidade de todo o time, com apoio da liderança?"),
    ("leadership12", Pillar::Lideranca, "A liderança revisa periodicamente a estratégia de testes da organização?"),
    ("leadership13", Pillar::Lideranca, "Os objetivos de qualidade fazem parte das metas corporativas?"),
    // Processos
    ("process1", Pillar::Processos, "Existe um processo de desenvolvimento documentado e seguido pelos times?"),
    ("process2", Pillar::Processos, "Os critérios de aceitação são definidos antes do início do desenvolvimento?"),
    ("process3", Pillar::Processos, "Existe uma definição de pronto que inclui critérios de qualidade?"),
    ("process4", Pillar::Processos, "O processo de gestão de defeitos é padronizado entre os times?"),
    ("process5", Pillar::Processos, "Revisões de código são obrigatórias antes da integração?"),
    ("process6", Pillar::Processos, "Existe um fluxo formal de homologação antes de cada release?"),
    ("process7", Pillar::Processos, "Os requisitos são refinados com participação do time de qualidade?"),
    ("process8", Pillar::Processos, "Mudanças de escopo passam por avaliação de impacto em testes?"),
    ("process9", Pillar::Processos, "O versionamento de código segue um fluxo definido e documentado?"),
    ("process10", Pillar::Processos, "Existem políticas de branch e merge aplicadas por ferramenta?"),
    ("process11", Pillar::Processos, "O processo prevê testes de regressão antes de cada entrega?"),
    ("process12", Pillar::Processos, "Os ambientes de teste são provisionados por processo padronizado?"),
    ("process13", Pillar::Processos, "Lições aprendidas de incidentes retroalimentam o processo?"),
    // Pessoas e Cultura
    ("culture1", Pillar::PessoasCultura, "Os times se sentem responsáveis pela qualidade do que entregam?"),
    ("culture2", Pillar::PessoasCultura, "Erros são tratados como oportunidade de aprendizado, não de punição?"),
    ("culture3", Pillar::PessoasCultura, "Existe colaboração constante entre desenvolvedores e analistas de qualidade?"),
    ("culture4", Pillar::PessoasCultura, "Novos integrantes recebem onboarding sobre práticas de qualidade?"),
    ("culture5", Pillar::PessoasCultura, "O time compartilha conhecimento de testes em sessões internas?"),
    ("culture6", Pillar::PessoasCultura, "Profissionais de qualidade participam das cerimônias do time?"),
    ("culture7", Pillar::PessoasCultura, "Há incentivo para certificações e cursos na área de qualidade?"),
    ("culture8", Pillar::PessoasCultura, "O time tem autonomia para bloquear uma entrega por risco de qualidade?"),
    ("culture9", Pillar::PessoasCultura, "Feedbacks sobre qualidade circulam entre times diferentes?"),
    ("culture10", Pillar::PessoasCultura, "O conhecimento sobre testes é preservado quando há trocas no time?"),
    ("culture11", Pillar::PessoasCultura, "Existe uma comunidade de prática de qualidade na organização?"),
    ("culture12", Pillar::PessoasCultura, "O time celebra melhorias mensuráveis de qualidade?"),
    ("culture13", Pillar::PessoasCultura, "Pessoas de negócio participam da validação das entregas?"),
    // Testes Funcionais
    ("testing1", Pillar::TestesFuncionais, "Os casos de teste funcionais são documentados em ferramenta própria?"),
    ("testing2", Pillar::TestesFuncionais, "Os testes funcionais cobrem os principais fluxos de negócio?"),
    ("testing3", Pillar::TestesFuncionais, "Existe priorização de testes funcionais baseada em risco?"),
    ("testing4", Pillar::TestesFuncionais, "Os testes exploratórios são praticados de forma estruturada?"),
    ("testing5", Pillar::TestesFuncionais, "A massa de dados de teste é gerada de forma controlada?"),
    ("testing6", Pillar::TestesFuncionais, "A regressão funcional é reexecutada a cada entrega?"),
    ("testing7", Pillar::TestesFuncionais, "Defeitos encontrados geram novos casos de teste?"),
    ("testing8", Pillar::TestesFuncionais, "Existe rastreabilidade entre requisitos e casos de teste?"),
    ("testing9", Pillar::TestesFuncionais, "Os testes de aceitação são validados com o usuário final?"),
    ("testing10", Pillar::TestesFuncionais, "Testes de usabilidade fazem parte do ciclo de entrega?"),
    ("testing11", Pillar::TestesFuncionais, "A cobertura dos testes funcionais é revisada periodicamente?"),
    ("testing12", Pillar::TestesFuncionais, "Os roteiros de teste são atualizados quando o produto muda?"),
    ("testing13", Pillar::TestesFuncionais, "Quais modalidades de teste são praticadas atualmente pelo seu time?"),
    // Testes Automatizados
    ("automation1", Pillar::TestesAutomatizados, "Existe uma estratégia de automação de testes definida?"),
    ("automation2", Pillar::TestesAutomatizados, "Os testes unitários fazem parte da rotina de desenvolvimento?"),
    ("automation3", Pillar::TestesAutomatizados, "A cobertura de testes unitários é medida e acompanhada?"),
    ("automation4", Pillar::TestesAutomatizados, "Existem testes automatizados de integração entre serviços?"),
    ("automation5", Pillar::TestesAutomatizados, "Os testes de interface de ponta a ponta são automatizados?"),
    ("automation6", Pillar::TestesAutomatizados, "A suíte automatizada roda a cada alteração de código?"),
    ("automation7", Pillar::TestesAutomatizados, "Falhas da suíte automatizada bloqueiam a integração do código?"),
    ("automation8", Pillar::TestesAutomatizados, "Os testes automatizados rodam em pipeline de integração contínua?"),
    ("automation9", Pillar::TestesAutomatizados, "O tempo de execução da suíte automatizada é monitorado?"),
    ("automation10", Pillar::TestesAutomatizados, "Testes instáveis são tratados com prioridade?"),
    ("automation11", Pillar::TestesAutomatizados, "A automação cobre também cenários negativos e de borda?"),
    ("automation12", Pillar::TestesAutomatizados, "Scripts de automação passam por revisão de código?"),
    ("automation13", Pillar::TestesAutomatizados, "Existe automação de testes de API com validação de contrato?"),
    // Métricas e Indicadores
    ("metrics1", Pillar::Metricas, "O time acompanha a densidade de defeitos por entrega?"),
    ("metrics2", Pillar::Metricas, "O vazamento de defeitos para produção é medido?"),
    ("metrics3", Pillar::Metricas, "Existe painel visível com indicadores de qualidade?"),
    ("metrics4", Pillar::Metricas, "O lead time das correções de defeito é medido?"),
    ("metrics5", Pillar::Metricas, "A taxa de sucesso das execuções de teste é acompanhada?"),
    ("metrics6", Pillar::Metricas, "Os indicadores de qualidade influenciam o planejamento das sprints?"),
    ("metrics7", Pillar::Metricas, "Metas quantitativas de qualidade são definidas e revisadas?"),
    ("metrics8", Pillar::Metricas, "O custo de retrabalho causado por defeitos é estimado?"),
    ("metrics9", Pillar::Metricas, "Indicadores de cobertura de testes são reportados à liderança?"),
    ("metrics10", Pillar::Metricas, "A satisfação do usuário é medida após cada release?"),
    ("metrics11", Pillar::Metricas, "Incidentes de produção são classificados por severidade e causa raiz?"),
    ("metrics12", Pillar::Metricas, "O histórico de métricas é usado para prever riscos de entrega?"),
    ("metrics13", Pillar::Metricas, "Os times comparam seus indicadores com referências de mercado?"),
    // Ferramentas e DevOps
    ("devops1", Pillar::Devops, "Existe pipeline de integração contínua para todos os repositórios?"),
    ("devops2", Pillar::Devops, "O deploy em produção é automatizado?"),
    ("devops3", Pillar::Devops, "Os ambientes de teste são criados sob demanda?"),
    ("devops4", Pillar::Devops, "Ferramentas de análise estática de código são usadas no pipeline?"),
    ("devops5", Pillar::Devops, "O monitoramento de produção gera alertas acionáveis?"),
    ("devops6", Pillar::Devops, "Logs centralizados estão disponíveis para investigação de defeitos?"),
    ("devops7", Pillar::Devops, "Feature flags são usadas para reduzir risco de release?"),
    ("devops8", Pillar::Devops, "Existe estratégia de rollback automatizada para releases com falha?"),
    ("devops9", Pillar::Devops, "A gestão de dependências e vulnerabilidades é automatizada?"),
    ("devops10", Pillar::Devops, "Dados sensíveis são mascarados nos ambientes de teste?"),
    ("devops11", Pillar::Devops, "As ferramentas de teste estão integradas ao fluxo de trabalho do time?"),
    ("devops12", Pillar::Devops, "A infraestrutura de testes suporta execução em paralelo?"),
    ("devops13", Pillar::Devops, "Versões de aplicação e configuração são rastreáveis em produção?"),
];
