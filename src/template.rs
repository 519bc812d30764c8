//! Checklist template seed
//!
//! The good-practices checklist every new report is instantiated from.
//! Category and item order encode the regulatory numbering and must not be
//! rearranged; item codes and descriptions are reproduced verbatim.

use serde::Serialize;

/// Identifier of the checklist revision shipped with this crate
pub const TEMPLATE_VERSION: &str = "boas-praticas-2024.1";

/// A single inspection point in the template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChecklistItemTemplate {
    pub code: &'static str,
    pub description: &'static str,
    pub order: u32,
}

/// A template category with its ordered items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChecklistCategoryTemplate {
    pub name: &'static str,
    pub order: u32,
    pub items: &'static [ChecklistItemTemplate],
}

/// The fixed checklist, in authored order
pub fn template() -> &'static [ChecklistCategoryTemplate] {
    TEMPLATE
}

/// Total number of items across all categories
pub fn item_count() -> usize {
    TEMPLATE.iter().map(|c| c.items.len()).sum()
}

/// Look up a template item by its regulatory code
pub fn find_item(code: &str) -> Option<&'static ChecklistItemTemplate> {
    TEMPLATE
        .iter()
        .flat_map(|c| c.items.iter())
        .find(|item| item.code == code)
}

const fn item(
    code: &'static str,
    description: &'static str,
    order: u32,
) -> ChecklistItemTemplate {
    ChecklistItemTemplate {
        code,
        description,
        order,
    }
}

static TEMPLATE: &[ChecklistCategoryTemplate] = &[
    ChecklistCategoryTemplate {
        name: "1 - EDIFICAÇÃO E INSTALAÇÕES",
        order: 1,
        items: &[
            item(
                "1.1.1",
                "Livre de objetos em desuso ou estranhos ao ambiente e sem a presença de animais. Com acesso controlado, independente e exclusivo (não comum a outros usos como habitação, etc.).",
                1,
            ),
            item(
                "1.2.1",
                "Revestimento liso, impermeável e lavável e em adequado estado de conservação.",
                2,
            ),
            item(
                "1.3.1",
                "Ajustadas aos batentes.",
                3,
            ),
            item(
                "1.3.2",
                "Portas na área de preparação de alimentos dotadas de fechamento automático.",
                4,
            ),
            item(
                "1.3.3",
                "Janelas e outras aberturas das áreas de armazenamento e preparação de alimentos, providas de telas milimetradas e removíveis.",
                5,
            ),
            item(
                "1.4.1",
                "Separados por sexo e em quantidade suficiente.",
                6,
            ),
            item(
                "1.4.2",
                "Independentes e sem comunicação direta com a área de preparação e armazenamento de alimentos ou refeitórios.",
                7,
            ),
            item(
                "1.4.3",
                "Mantidos organizados e em adequado estado de conservação.",
                8,
            ),
            item(
                "1.4.4",
                "Portas de acesso dotadas de fechamento automático.",
                9,
            ),
            item(
                "1.4.5",
                "Instalações sanitárias com lavatórios e supridas de produtos destinados à higiene pessoal tais como papel higiênico, sabonete líquido inodoro anti-séptico e toalhas de papel não reciclado ou outro sistema higiênico e seguro para secagem das mãos.",
                10,
            ),
            item(
                "1.4.6",
                "Coletores dos resíduos dotados de tampa e acionados sem contato manual.",
                11,
            ),
            item(
                "1.4.7",
                "Instalações sanitárias para clientes atendem os mesmos requisitos descritos para funcionários.",
                12,
            ),
            item(
                "1.5.1",
                "Existência de lavatórios exclusivos para a higiene das mãos na área de manipulação com cartaz de orientação sobre a correta lavagem das mãos, dotados de torneiras com fechamento automático, sabonete líquido inodoro anti-séptico, toalhas de papel não reciclado ou outro sistema higiênico e seguro de secagem das mãos e coletor de papel acionado sem contato manual.",
                13,
            ),
            item(
                "1.6.1",
                "Iluminação da área de preparação dos alimentos proporciona a visualização e não compromete a higienização e as características sensoriais dos alimentos.",
                14,
            ),
            item(
                "1.6.2",
                "Luminárias apropriadas com sistema de proteção contra explosão e quedas acidentais em todo o estabelecimento.",
                15,
            ),
            item(
                "1.6.3",
                "Instalações elétricas embutidas ou protegidas em tubulações externas e íntegras, de tal forma a permitir a higienização dos ambientes.",
                16,
            ),
            item(
                "1.7.1",
                "Equipamentos e filtros para climatização conservados.",
                17,
            ),
            item(
                "1.7.2",
                "Apresentou registro (planilhas) da limpeza dos componentes do sistema de climatização e troca de filtros.",
                18,
            ),
            item(
                "1.8.1",
                "Garante a renovação do ar e mantém o ambiente livre de gases, fumaça, partículas em suspensão (pó, fuligem), condensação de vapores.",
                19,
            ),
            item(
                "1.8.2",
                "Não incidência do fluxo de ar diretamente sobre os alimentos de ventilador e ar condicionado.",
                20,
            ),
            item(
                "1.9.1",
                "Ausência de vetores e pragas urbanas e/ou qualquer evidência de sua presença como fezes, ninhos e outros.",
                21,
            ),
            item(
                "1.9.2",
                "Adota medidas para não atrair vetores e pragas urbanas, como o não acúmulo de lixo e restos de alimentos.",
                22,
            ),
            item(
                "1.9.3",
                "Apresentou comprovante de execução do serviço constando o prazo de validade, expedido por empresa especializada licenciada no órgão competente.",
                23,
            ),
            item(
                "1.10.1",
                "Instalações abastecidas com água corrente.",
                24,
            ),
            item(
                "1.10.2",
                "Possui laudos atestando a potabilidade da água, realizado periodicamente.",
                25,
            ),
            item(
                "1.10.3",
                "Reservatório de água edificado e ou revestido de materiais que não comprometam a qualidade da água, limpos periodicamente, conservados e devidamente tampados.",
                26,
            ),
            item(
                "1.11.1",
                "Gelo é mantido em condição higiênico-sanitária que evite sua contaminação e armazenado em local exclusivo.",
                27,
            ),
            item(
                "1.12.1",
                "O estabelecimento dispõe de lixeiras em número e capacidade suficiente, dotados de saco plástico e com tampa acionada sem contato manual.",
                28,
            ),
            item(
                "1.12.2",
                "Realiza a retirada com freqüência e estocar em local isolado das áreas de preparação e armazenamento dos alimentos.",
                29,
            ),
            item(
                "1.13.1",
                "Dispõe de conexões com rede de esgoto ou fossa séptica.",
                30,
            ),
            item(
                "1.13.2",
                "Ralos com dispositivo que permitam seu fechamento.",
                31,
            ),
            item(
                "1.13.3",
                "Caixas de gordura e esgoto localizadas fora da área de preparação, armazenamento de alimentos e limpos periodicamente.",
                32,
            ),
            item(
                "1.14.1",
                "Edificação e instalações projetadas de forma a possibilitar um fluxo ordenado e sem cruzamentos em todas as etapas da preparação de alimentos facilitando as operações de manutenção e higienização.",
                33,
            ),
        ],
    },
    ChecklistCategoryTemplate {
        name: "2 - EQUIPAMENTOS, MÓVEIS E UTENSÍLIOS",
        order: 2,
        items: &[
            item(
                "2.1",
                "Os que entram em contato com alimentos são de materiais que não liberam substâncias tóxicas, odores, sabores e em adequado estado de conservação.",
                1,
            ),
            item(
                "2.2",
                "Possuem superfícies lisas, impermeáveis, laváveis que não possam comprometer a higienização.",
                2,
            ),
            item(
                "2.3",
                "Os fogões, chapas, fritadeiras e similares são dotados de coifa ou outro dispositivo de exaustão.",
                3,
            ),
        ],
    },
    ChecklistCategoryTemplate {
        name: "3 - HIGIENIZAÇÃO DAS INSTALAÇÕES, EQUIPAMENTOS, MÓVEIS E UTENSÍLIOS",
        order: 3,
        items: &[
            item(
                "3.1",
                "Mantidos em boas condições higiênico-sanitárias.",
                1,
            ),
            item(
                "3.2",
                "Operação de higienização realizadas por funcionários comprovadamente capacitados.",
                2,
            ),
            item(
                "3.3",
                "Produtos de higienização e material de limpeza identificados e guardados em local reservado para essa finalidade.",
                3,
            ),
            item(
                "3.4",
                "Materiais utilizados para higienização das instalações são distintos dos utilizados para higienização dos equipamentos, móveis e utensílios.",
                4,
            ),
        ],
    },
    ChecklistCategoryTemplate {
        name: "4 - MANIPULADORES",
        order: 4,
        items: &[
            item(
                "4.1.1",
                "Utilizam uniformes compatíveis com a atividade. Estão conservados, limpos, com uso exclusivo nas dependências internas e trocados no mínimo diariamente.",
                1,
            ),
            item(
                "4.1.2",
                "As roupas e objetos pessoais estão guardados em local específico (vestiário).",
                2,
            ),
            item(
                "4.1.3",
                "Asseio pessoal: mãos limpas, unhas curtas, sem esmalte, sem adornos (anéis, pulseiras, brincos, etc.) e maquiagem. Cabelos presos e protegidos por redes, toucas ou outro acessório apropriado para esse fim, não sendo permitido o uso de barba.",
                3,
            ),
            item(
                "4.2.1",
                "Manipuladores possuem Atestado de Saúde Ocupacional (ASO).",
                4,
            ),
            item(
                "4.2.2",
                "Manipuladores que apresentam lesões e ou sintomas de enfermidades que possam comprometer a qualidade higiênico-sanitária dos alimentos estão afastados da atividade de preparação de alimentos.",
                5,
            ),
            item(
                "4.3.1",
                "Existência de capacitação periódica em higiene pessoal, manipulação higiênica de alimentos e em doenças transmitidas por alimentos.",
                6,
            ),
            item(
                "4.3.2",
                "Possuem registros dessas capacitações, contendo no mínimo (conteúdo programático, data, período, número de funcionários participantes).",
                7,
            ),
        ],
    },
    ChecklistCategoryTemplate {
        name: "5 - MATÉRIAS-PRIMAS",
        order: 5,
        items: &[
            item(
                "5.1.1",
                "Embalagens primárias das matérias-primas e dos ingredientes íntegros.",
                1,
            ),
            item(
                "5.1.2",
                "Matérias-primas armazenadas em local limpo e organizado, sobre paletes, estrados e ou prateleiras de material liso, resistente, impermeável e lavável.",
                2,
            ),
        ],
    },
    ChecklistCategoryTemplate {
        name: "6 - PREPARAÇÃO DO ALIMENTO",
        order: 6,
        items: &[
            item(
                "6.1.1",
                "Na preparação dos alimentos são adotadas medidas para minimizar o risco de contaminação cruzada.",
                1,
            ),
            item(
                "6.1.2",
                "Não há contato entre alimentos crus e prontos para o consumo.",
                2,
            ),
            item(
                "6.1.3",
                "Funcionários que manipulam alimentos crus realizam a lavagem e a anti-sépsia das mãos antes de manusear alimentos preparados e entre uma atividade e outra.",
                3,
            ),
            item(
                "6.1.4",
                "Produtos perecíveis expostos à temperatura ambiente somente pelo tempo mínimo necessário para a preparação do alimento.",
                4,
            ),
            item(
                "6.2.1",
                "Os alimentos retirados da embalagem original estão acondicionados em sacos, potes plásticos, vidro com tampa e identificados com nome do produto, data de fracionamento e prazo de validade.",
                5,
            ),
            item(
                "6.3.1",
                "Aquecidos a temperaturas não superiores a 180ºC (cento e oitenta graus Celsius).",
                6,
            ),
            item(
                "6.3.2",
                "Substituídos imediatamente sempre que há alteração evidente do aroma, do sabor e da formação intensa de espuma e fumaça.",
                7,
            ),
            item(
                "6.4.1",
                "Descongelamento realizado em condições de refrigeração à temperatura inferior a 4ºC (quatro graus Celsius) ou em forno de microondas.",
                8,
            ),
            item(
                "6.4.2",
                "Alimentos descongelados estão mantidos sob refrigeração e não são novamente recongelados.",
                9,
            ),
            item(
                "6.5.1",
                "Os alimentos preparados a quente devem ser conservados à temperatura superior a 60ºC (sessenta graus Celsius) por, no máximo, 6 (seis) horas.",
                10,
            ),
            item(
                "6.6.1",
                "No resfriamento a temperatura do alimento é reduzida de 60ºC (sessenta graus Celsius) a 10ºC (dez graus Celsius) em até duas horas.",
                11,
            ),
            item(
                "6.6.2",
                "O alimento preparado é resfriado antes da conservação sob refrigeração ou congelamento.",
                12,
            ),
            item(
                "6.7.1",
                "Sob refrigeração o alimento está conservado a temperatura igual ou inferior a 4ºC (quatro graus Celsius), e congelado à temperatura igual ou inferior a -18ºC (dezoito graus Celsius negativos).",
                13,
            ),
            item(
                "6.7.2",
                "Alimentos preparados são consumidos no prazo máximo de 5 (cinco) dias e conservado sob refrigeração, identificados com: nome do produto, data de preparo e prazo de validade.",
                14,
            ),
            item(
                "6.8.1",
                "Para alimentos consumidos crus é realizado a higienização (lavagem e desinfecção).",
                15,
            ),
            item(
                "6.8.2",
                "Produtos utilizados na higienização dos alimentos regularizados junto a ANVISA/MS.",
                16,
            ),
            item(
                "6.9.1",
                "O estabelecimento possui um responsável capacitado pela atividade de manipulação.",
                17,
            ),
            item(
                "6.9.2",
                "O responsável pelas atividades de manipulação dos alimentos possui comprovante de curso de capacitação de alimentos, abordando, no mínimo, os seguintes temas: Contaminantes alimentares, Doenças transmitidas por alimentos, Manipulação higiênica dos alimentos e Boas Práticas.",
                18,
            ),
        ],
    },
    ChecklistCategoryTemplate {
        name: "7 - TRANSPORTE",
        order: 7,
        items: &[
            item(
                "7.1.1",
                "Armazenamento, transporte e consumo do alimento preparado ocorrem em condições de tempo e temperatura que não comprometam sua qualidade higiênico-sanitária.",
                1,
            ),
            item(
                "7.1.2",
                "A temperatura do alimento preparado é monitorada durante as etapas de armazenamento, transporte e exposição para consumo quando aplicável.",
                2,
            ),
            item(
                "7.1.3",
                "Veículos dotados de cobertura para proteção da carga, exclusivo para alimentos.",
                3,
            ),
            item(
                "7.1.4",
                "Possui registro desse monitoramento.",
                4,
            ),
            item(
                "7.1.5",
                "Veículos licenciados pelo órgão competente.",
                5,
            ),
        ],
    },
    ChecklistCategoryTemplate {
        name: "8 - EXPOSIÇÃO AO CONSUMO",
        order: 8,
        items: &[
            item(
                "8.1.1",
                "Mantida organizada e limpa.",
                1,
            ),
            item(
                "8.1.2",
                "Equipamentos, móveis e utensílios disponíveis nessa área compatíveis com as atividades, em número suficiente e em bom estado de conservação.",
                2,
            ),
            item(
                "8.1.3",
                "Manipuladores realizam anti-sepsia das mãos e uso de utensílios ou luvas descartáveis, para tocar os alimentos.",
                3,
            ),
            item(
                "8.2.1",
                "Equipamento de exposição devidamente dimensionado, limpo, conservado e com dispositivo de medição de temperatura.",
                4,
            ),
            item(
                "8.2.2",
                "Equipamento de exposição do alimento preparado, na área para consumo, dispõe de barreiras de proteção que previnam a contaminação em decorrência da proximidade ou da ação do consumidor e de outras fontes.",
                5,
            ),
            item(
                "8.2.3",
                "Existência próximo ao equipamento de exposição do alimento preparado de: 1- Lavatório exclusivo para os clientes com cartaz de orientação sobre a correta lavagem das mãos, dotados de torneiras com fechamento automático, sabonete líquido inodoro anti-séptico, álcool gel a 70°, toalhas de papel não reciclado ou outro sistema higiênico e seguro de secagem das mãos e coletor de papel acionado sem contato manual. 2- Ou álcool gel a 70°.",
                6,
            ),
            item(
                "8.2.4",
                "Existência de cartaz de orientação ao consumidor, no início do equipamento de exposição dos alimentos, com o dizer: \"PARA SEGURANÇA DE SUA SAÚDE E DE TERCEIROS NÃO FALE ENQUANTO ESTIVER SE SERVINDO\".",
                7,
            ),
            item(
                "8.3.1",
                "Utensílios utilizados: pratos, copos, talheres, descartáveis, quando feitos de material não-descartável, devidamente higienizados e armazenados em local protegido.",
                8,
            ),
            item(
                "8.4.1",
                "Se localizados na área de consumo, ou refeitório não constituem fonte de contaminação para os alimentos preparados.",
                9,
            ),
            item(
                "8.5.1",
                "Área de recebimento de dinheiro, cartões e outros meios utilizados para o pagamento de despesas é reservada e com funcionário exclusivo para esta atividade.",
                10,
            ),
        ],
    },
    ChecklistCategoryTemplate {
        name: "9 - AMOSTRA DE ALIMENTOS",
        order: 9,
        items: &[
            item(
                "9.1.1",
                "O estabelecimento guarda uma amostra de 75 a 100g (setenta e cinco a cem gramas) de cada alimento preparado sob refrigeração, armazenado em recipiente descartável de primeiro uso, por no mínimo 72 (setenta e duas) horas para ser entregue a autoridade sanitária quando solicitado em caso de Doenças Transmitidas por Alimentos, contendo as seguintes informações: nome do produto, data de preparo, data que foi servido o alimento e refeição (almoço, janta, etc).",
                1,
            ),
        ],
    },
    ChecklistCategoryTemplate {
        name: "10 - DOCUMENTAÇÃO E REGISTRO",
        order: 10,
        items: &[
            item(
                "10.1.1",
                "Dispõe de Manual de Boas Práticas e de Procedimentos Operacionais Padronizados.",
                1,
            ),
            item(
                "10.1.2",
                "Esses documentos estão acessíveis aos funcionários envolvidos e disponíveis à Autoridade Sanitária, quando requisitado.",
                2,
            ),
            item(
                "10.2.1.1",
                "Existência de POP estabelecido para Higienização das instalações, equipamentos, móveis e utensílios.",
                3,
            ),
            item(
                "10.2.1.2",
                "POP descrito, sendo cumprido.",
                4,
            ),
            item(
                "10.2.2.1",
                "Existência de POP estabelecido para Controle integrado de vetores e pragas urbanas.",
                5,
            ),
            item(
                "10.2.2.2",
                "POP descrito, sendo cumprido.",
                6,
            ),
            item(
                "10.2.3.1",
                "Existência de POP estabelecido para Higienização do reservatório.",
                7,
            ),
            item(
                "10.2.3.2",
                "POP descrito, sendo cumprido.",
                8,
            ),
            item(
                "10.2.4.1",
                "Existência de POP estabelecido para Higiene e saúde dos manipuladores.",
                9,
            ),
            item(
                "10.2.4.2",
                "POP descrito, sendo cumprido.",
                10,
            ),
        ],
    },
];
